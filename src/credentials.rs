use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

const ACCESS_TOKEN: &str = "oauth.accessToken";
const ACCESS_TOKEN_SECRET: &str = "oauth.accessTokenSecret";
const CONSUMER_KEY: &str = "oauth.consumerKey";
const CONSUMER_SECRET: &str = "oauth.consumerSecret";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Unable to read auth file {0}: it must contain access token, access token secret, consumer key and consumer secret")]
    Unreadable(PathBuf, #[source] std::io::Error),
    #[error("Malformed line {line} in auth file, expected key=value")]
    MalformedLine { line: usize },
    #[error("Improper auth file, missing {0}")]
    MissingField(&'static str),
}

/// OAuth 1.0a keys for a single application/user pair, in the
/// `oauth.<field>=<value>` properties format Twitter4J uses:
///
/// ```text
/// oauth.accessToken=...
/// oauth.accessTokenSecret=...
/// oauth.consumerKey=...
/// oauth.consumerSecret=...
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub access_token_secret: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| CredentialsError::Unreadable(path.to_path_buf(), e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, CredentialsError> {
        let mut access_token = None;
        let mut access_token_secret = None;
        let mut consumer_key = None;
        let mut consumer_secret = None;

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or(CredentialsError::MalformedLine { line: index + 1 })?;
            let slot = match key.trim() {
                ACCESS_TOKEN => &mut access_token,
                ACCESS_TOKEN_SECRET => &mut access_token_secret,
                CONSUMER_KEY => &mut consumer_key,
                CONSUMER_SECRET => &mut consumer_secret,
                other => {
                    log::debug!("Ignoring unknown auth key: {}", other);
                    continue;
                }
            };
            *slot = Some(value.trim().to_string());
        }

        Ok(Self {
            access_token: access_token.ok_or(CredentialsError::MissingField(ACCESS_TOKEN))?,
            access_token_secret: access_token_secret
                .ok_or(CredentialsError::MissingField(ACCESS_TOKEN_SECRET))?,
            consumer_key: consumer_key.ok_or(CredentialsError::MissingField(CONSUMER_KEY))?,
            consumer_secret: consumer_secret
                .ok_or(CredentialsError::MissingField(CONSUMER_SECRET))?,
        })
    }
}

// Keep secrets out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WELL_FORMED: &str = "oauth.accessToken=at-123\n\
        oauth.accessTokenSecret=ats-456\n\
        oauth.consumerKey=ck-789\n\
        oauth.consumerSecret=cs-000\n";

    fn write_auth(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn loads_all_four_fields() {
        let file = write_auth(WELL_FORMED);
        let credentials = Credentials::load(file.path()).await.unwrap();
        assert_eq!(
            credentials,
            Credentials {
                access_token: "at-123".into(),
                access_token_secret: "ats-456".into(),
                consumer_key: "ck-789".into(),
                consumer_secret: "cs-000".into(),
            }
        );
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::load(dir.path().join("auth.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialsError::Unreadable(..)));
    }

    #[test]
    fn missing_key_fails() {
        let contents = "oauth.accessToken=a\noauth.accessTokenSecret=b\noauth.consumerKey=c\n";
        let err = Credentials::parse(contents).unwrap_err();
        assert!(matches!(
            err,
            CredentialsError::MissingField("oauth.consumerSecret")
        ));
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let contents = "oauth.accessToken=a\noauth.accessTokenSecret\n";
        let err = Credentials::parse(contents).unwrap_err();
        assert!(matches!(err, CredentialsError::MalformedLine { line: 2 }));
    }

    #[test]
    fn tolerates_comments_blanks_and_unknown_keys() {
        let contents = format!(
            "# generated by hand\n\n{}debug=true\n oauth.consumerKey = spaced==\n",
            WELL_FORMED
        );
        let credentials = Credentials::parse(&contents).unwrap();
        assert_eq!(credentials.consumer_key, "spaced==");
        assert_eq!(credentials.access_token, "at-123");
    }

    #[test]
    fn debug_hides_secrets() {
        let credentials = Credentials::parse(WELL_FORMED).unwrap();
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("ck-789"));
        assert!(!printed.contains("cs-000"));
        assert!(!printed.contains("ats-456"));
    }
}
