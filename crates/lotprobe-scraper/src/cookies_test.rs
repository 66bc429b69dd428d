use std::io::Write;

use super::*;

const LONG_A: &str = "AbCdEfGhIjKlMnOpQrStUvWx";
const LONG_B: &str = "0123456789abcdefghij0123";

fn jar_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write jar");
    file
}

#[test]
fn load_keeps_short_session_cookie() {
    let file = jar_file("sessionid abcd\n");
    let jar = load(file.path());
    assert_eq!(jar.get("sessionid"), Some("abcd"));
}

#[test]
fn load_drops_short_non_session_cookie() {
    let file = jar_file("x 0123456789\n");
    let jar = load(file.path());
    assert!(jar.is_empty());
}

#[test]
fn load_session_match_is_case_insensitive() {
    let file = jar_file("ASP.NET_SessionId ab12\n");
    let jar = load(file.path());
    assert_eq!(jar.get("ASP.NET_SessionId"), Some("ab12"));
}

#[test]
fn load_keeps_long_values() {
    let file = jar_file(&format!("incap_ses_1 {LONG_A}\nshort 1\n"));
    let jar = load(file.path());
    assert_eq!(jar.len(), 1);
    assert_eq!(jar.get("incap_ses_1"), Some(LONG_A));
}

#[test]
fn load_all_keeps_every_cookie_line() {
    let file = jar_file("short 1\nsessionid abcd\n");
    let jar = load_all(file.path());
    assert_eq!(jar.len(), 2);
}

#[test]
fn load_reads_netscape_lines() {
    let contents = format!(
        "# Netscape HTTP Cookie File\n\
         .copart.com\tTRUE\t/\tTRUE\t0\tvisid_incap_1\t{LONG_A}\n\
         #HttpOnly_.copart.com\tTRUE\t/\tTRUE\t0\tg2app.sessionId\tzz\n"
    );
    let file = jar_file(&contents);
    let jar = load(file.path());
    assert_eq!(jar.get("visid_incap_1"), Some(LONG_A));
    assert_eq!(jar.get("g2app.sessionId"), Some("zz"));
    assert_eq!(jar.len(), 2);
}

#[test]
fn load_skips_values_outside_token_charset() {
    let file = jar_file(&format!("bad {LONG_A}%22\n"));
    assert!(load(file.path()).is_empty());
    assert_eq!(
        load_all(file.path()).get("bad"),
        Some(format!("{LONG_A}%22").as_str())
    );
}

#[test]
fn load_missing_file_is_empty_jar() {
    let dir = tempfile::tempdir().unwrap();
    let jar = load(&dir.path().join("nope.txt"));
    assert!(jar.is_empty());
    assert_eq!(jar.serialize(), "");
}

#[test]
fn serialize_joins_in_file_order() {
    let file = jar_file(&format!("b_cookie {LONG_B}\na_cookie {LONG_A}\nsessionid abcd\n"));
    let jar = load(file.path());
    assert_eq!(
        jar.serialize(),
        format!("b_cookie={LONG_B}; a_cookie={LONG_A}; sessionid=abcd")
    );
}

#[test]
fn duplicate_names_keep_first_position_last_value() {
    let file = jar_file(&format!("sessionid one\nother {LONG_A}\nsessionid two\n"));
    let jar = load(file.path());
    assert_eq!(
        jar.serialize(),
        format!("sessionid=two; other={LONG_A}")
    );
}

#[test]
fn with_overrides_replaces_same_name() {
    let file = jar_file("sessionid old\n");
    let jar = load_all(file.path())
        .with_overrides(&[Cookie::new("sessionid", "new"), Cookie::new("x", "1")]);
    assert_eq!(jar.serialize(), "sessionid=new; x=1");
}

#[test]
fn parse_cookie_header_round_trips() {
    let cookies = parse_cookie_header("a=1; b=two=2;; =skip; c=");
    assert_eq!(
        cookies,
        vec![
            Cookie::new("a", "1"),
            Cookie::new("b", "two=2"),
            Cookie::new("c", ""),
        ]
    );
}

#[test]
fn delete_removes_file_and_ignores_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");
    std::fs::write(&path, "sessionid abcd\n").unwrap();
    delete(&path);
    assert!(!path.exists());
    delete(&path);
}

#[test]
fn merge_set_cookies_adds_and_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");
    std::fs::write(&path, "sessionid old\n").unwrap();

    let incap = format!("incap_ses_9={LONG_A}; Domain=.copart.com");
    merge_set_cookies(&path, &["sessionid=new; Path=/; HttpOnly", incap.as_str()]);

    let jar = load_all(&path);
    assert_eq!(jar.get("sessionid"), Some("new"));
    assert_eq!(jar.get("incap_ses_9"), Some(LONG_A));
}

#[test]
fn merge_set_cookies_expires_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");
    std::fs::write(&path, format!("sessionid abcd\nkeep {LONG_A}\n")).unwrap();

    merge_set_cookies(&path, &["sessionid=gone; Max-Age=0"]);

    let jar = load_all(&path);
    assert_eq!(jar.get("sessionid"), None);
    assert_eq!(jar.get("keep"), Some(LONG_A));
}

#[test]
fn merge_set_cookies_keeps_percent_encoded_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");

    merge_set_cookies(&path, &["token=abc%2Fdef%3D; Path=/", "ok=plain"]);

    let jar = load_all(&path);
    assert_eq!(jar.get("token"), Some("abc%2Fdef%3D"));
    assert_eq!(jar.serialize(), "token=abc%2Fdef%3D; ok=plain");
}

#[test]
fn merge_set_cookies_removes_cookie_with_past_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");

    merge_set_cookies(&path, &["sid=abc"]);
    merge_set_cookies(&path, &["sid=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT"]);

    assert_eq!(load_all(&path).get("sid"), None);
}

#[test]
fn merge_set_cookies_keeps_cookie_with_future_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.txt");

    merge_set_cookies(&path, &["sid=abc; Expires=Fri, 01 Jan 2100 00:00:00 GMT; Path=/"]);

    assert_eq!(load_all(&path).get("sid"), Some("abc"));
}

#[test]
fn parse_set_cookie_reads_dashed_expires_and_prefers_max_age() {
    assert_eq!(
        parse_set_cookie("sid=x; expires=Thu, 01-Jan-1970 00:00:00 GMT"),
        Some(SetCookie::Expire("sid".to_owned()))
    );
    assert_eq!(
        parse_set_cookie("sid=x; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=3600"),
        Some(SetCookie::Store(Cookie::new("sid", "x")))
    );
    assert_eq!(
        parse_set_cookie("sid=x; Expires=not a date"),
        Some(SetCookie::Store(Cookie::new("sid", "x")))
    );
}

#[test]
fn merge_set_cookies_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.txt");
    merge_set_cookies(&path, &["sessionid=abcd"]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "sessionid abcd\n");
}

#[test]
fn merge_without_headers_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("untouched.txt");
    merge_set_cookies::<&str>(&path, &[]);
    assert!(!path.exists());
}

#[test]
fn parse_set_cookie_handles_quoted_value() {
    assert_eq!(
        parse_set_cookie("token=\"abc\"; Secure"),
        Some(SetCookie::Store(Cookie::new("token", "abc")))
    );
    assert_eq!(parse_set_cookie("novalue"), None);
}

#[test]
fn jar_path_appends_site_suffix() {
    let path = jar_path(Path::new("/tmp/jars"), "cookies_file.txt", SiteKind::Copart);
    assert_eq!(path, PathBuf::from("/tmp/jars/cookies_file.txt.copart.txt"));
}

#[tokio::test]
async fn jar_locks_are_per_site() {
    let locks = JarLocks::default();
    let _copart = locks.acquire(SiteKind::Copart).await;
    // A different site's lock must be free while Copart's is held.
    let iaai = tokio::time::timeout(
        std::time::Duration::from_millis(100),
        locks.acquire(SiteKind::Iaai),
    )
    .await;
    assert!(iaai.is_ok());
    // The same site's lock must not be.
    let copart_again = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        locks.acquire(SiteKind::Copart),
    )
    .await;
    assert!(copart_again.is_err());
}
