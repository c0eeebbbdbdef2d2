/// The one account the login endpoint knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Loose check of a login body: both braces and both the username and
    /// password literals must appear somewhere in it. The body is not
    /// parsed as JSON.
    pub fn matches(&self, body: &[u8]) -> bool {
        let Ok(body) = std::str::from_utf8(body) else {
            return false;
        };

        body.contains('{')
            && body.contains('}')
            && body.contains(self.username.as_str())
            && body.contains(self.password.as_str())
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("user0", "thepassword")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_braces_and_both_literals() {
        let creds = Credentials::default();

        assert!(creds.matches(br#"{"username":"user0","password":"thepassword"}"#));
        assert!(!creds.matches(br#""username":"user0","password":"thepassword""#));
        assert!(!creds.matches(br#"{"username":"user0"}"#));
        assert!(!creds.matches(b""));
    }
}
