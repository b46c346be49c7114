/// Representations the harness can negotiate or send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Xml,
    FormUrlEncoded,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Xml => "application/xml",
            MediaType::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    pub fn all() -> [MediaType; 3] {
        [MediaType::Json, MediaType::Xml, MediaType::FormUrlEncoded]
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
