use crate::domain::value::SenderName;

/// One outbound message: a single gateway round trip.
///
/// Neither the destination nor the body length is checked here; the host validates the
/// address and enforces the advertised body limit before pushing.
#[derive(Debug, Clone, Copy)]
pub struct PushSms<'a> {
    pub sender: &'a SenderName,
    pub to: &'a str,
    pub body: &'a [u8],
}
