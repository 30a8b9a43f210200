/// The regional API host segment of a Mailchimp account, e.g. `us1`.
///
/// Mailchimp API keys have the form `<key>-<datacenter>`; the datacenter is
/// whatever follows the last `-`. Must be instantiated with
/// `Datacenter::parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datacenter(String);

impl Datacenter {
    /// Fails if the key has no `-`, or nothing after it. The suffix is taken
    /// verbatim; we don't try to decide what a "plausible" datacenter looks
    /// like.
    pub fn parse(api_key: &str) -> Result<Self, String> {
        match api_key.rsplit_once('-') {
            Some((_, dc)) if !dc.is_empty() => Ok(Self(dc.to_string())),
            _ => Err("API key does not end in a datacenter (`<key>-<dc>`)".to_string()),
        }
    }
}

impl AsRef<str> for Datacenter {
    fn as_ref(&self) -> &str { &self.0 }
}
