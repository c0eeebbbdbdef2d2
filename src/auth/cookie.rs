/// Name of the cookie that carries the session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Finds `name` in a `Cookie` request header (`a=1; b=2`).
pub fn find<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim())
}

/// `Set-Cookie` value for a freshly issued session token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{}={}; Max-Age={}; path=/", AUTH_COOKIE, token, max_age_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_pair_among_others() {
        let header = "theme=dark; auth_token=abc.def.ghi ;lang=en";
        assert_eq!(find(header, AUTH_COOKIE), Some("abc.def.ghi"));
        assert_eq!(find(header, "missing"), None);
    }
}
