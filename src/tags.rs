// Copyright (C) 2026 by GiGa infosystems

//! Resolve the tags of a dependency's repository to the commits they point to
//!
//! This is only used to detect version changes that switch between a tag and the revision of
//! the same commit (or between two tags of the same commit). Only GitHub is supported, see
//! [`GitHubTags`].

use crate::util::short_revision;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A mapping from tag names to shortened commit IDs for a single repository
pub type TagIndex = BTreeMap<String, String>;

/// The default GitHub API endpoint
pub const GITHUB_API: &str = "https://api.github.com";

const GITHUB_PREFIX: &str = "github.com/";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("malformed tag listing from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that can list the tags of a dependency's repository
pub trait TagResolver {
    /// Returns the tags for a dependency, or `Ok(None)` if the dependency isn't hosted anywhere
    /// this resolver knows about.
    fn resolve(&self, dependency: &str) -> Result<Option<TagIndex>, ResolveError>;
}

impl<T: TagResolver + ?Sized> TagResolver for Box<T> {
    fn resolve(&self, dependency: &str) -> Result<Option<TagIndex>, ResolveError> {
        (**self).resolve(dependency)
    }
}

/// A [`TagResolver`] that never resolves anything
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl TagResolver for Offline {
    fn resolve(&self, _dependency: &str) -> Result<Option<TagIndex>, ResolveError> {
        Ok(None)
    }
}

/// HTTP basic authentication for the GitHub API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    /// A password or personal access token
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Only returns credentials if both parts are given and non-empty
    pub fn new(username: Option<String>, password: Option<String>) -> Option<Self> {
        let username = username.filter(|username| !username.is_empty())?;
        let password = password.filter(|password| !password.is_empty())?;
        Some(Credentials { username, password })
    }
}

/// Split a `github.com/<owner>/<repo>[/...]` import path into owner & repository
pub fn github_repository(dependency: &str) -> Option<(&str, &str)> {
    let mut segments = dependency.strip_prefix(GITHUB_PREFIX)?.split('/');
    let owner = segments.next().filter(|owner| !owner.is_empty())?;
    let repo = segments.next().filter(|repo| !repo.is_empty())?;
    Some((owner, repo))
}

#[derive(Deserialize)]
struct Tag {
    name: String,
    commit: Commit,
}

#[derive(Deserialize)]
struct Commit {
    sha: String,
}

/// Parse the JSON response of the GitHub "list repository tags" endpoint
pub fn parse_tags(json: &str) -> Result<TagIndex, serde_json::Error> {
    let tags = serde_json::from_str::<Vec<Tag>>(json)?;
    let index = tags
        .into_iter()
        .map(|tag| {
            let commit = short_revision(&tag.commit.sha).to_owned();
            (tag.name, commit)
        })
        .collect();
    Ok(index)
}

/// Lists tags using the GitHub REST API
///
/// Only the first page of tags (up to 100) is fetched, there is no retrying or caching.
pub struct GitHubTags {
    client: Client,
    api: String,
    credentials: Option<Credentials>,
}

impl GitHubTags {
    /// Create a client for the API at `api` (usually [`GITHUB_API`])
    pub fn new(api: &str, credentials: Option<Credentials>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self::with_client(client, api, credentials))
    }

    /// Use an already configured HTTP client
    pub fn with_client(client: Client, api: &str, credentials: Option<Credentials>) -> Self {
        GitHubTags {
            client,
            api: api.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    fn tags_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}/tags?per_page=100", self.api)
    }
}

impl TagResolver for GitHubTags {
    fn resolve(&self, dependency: &str) -> Result<Option<TagIndex>, ResolveError> {
        let Some((owner, repo)) = github_repository(dependency) else {
            return Ok(None);
        };

        let url = self.tags_url(owner, repo);
        log::debug!("Fetching tags of `{dependency}` from {url}");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(ref credentials) = self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(source) => return Err(ResolveError::Request { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status { url, status });
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(source) => return Err(ResolveError::Request { url, source }),
        };

        match parse_tags(&body) {
            Ok(tags) => {
                log::debug!("Found {} tags for `{dependency}`", tags.len());
                Ok(Some(tags))
            }
            Err(source) => Err(ResolveError::Decode { url, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    const TAGS: &str = r#"[
        {
            "name": "v1.1.0",
            "zipball_url": "https://api.github.com/repos/foo/bar/zipball/v1.1.0",
            "commit": {
                "sha": "abcdef1234567890abcdef1234567890abcdef12",
                "url": "https://api.github.com/repos/foo/bar/commits/abcdef1234567890abcdef1234567890abcdef12"
            }
        },
        {
            "name": "v1.0.0",
            "commit": { "sha": "0123456789abcdef0123456789abcdef01234567" }
        }
    ]"#;

    /// Serve a single HTTP response on a local port, returning the API base URL and a handle
    /// that yields the raw request
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }

            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();

            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    fn local_resolver(url: &str, credentials: Option<Credentials>) -> GitHubTags {
        let client = Client::builder()
            .user_agent("gopkg-moddiff/test")
            .no_proxy()
            .build()
            .unwrap();
        GitHubTags::with_client(client, url, credentials)
    }

    #[test]
    fn github_repositories() {
        assert_eq!(github_repository("github.com/foo/bar"), Some(("foo", "bar")));
        assert_eq!(
            github_repository("github.com/foo/bar/v2/sub"),
            Some(("foo", "bar"))
        );
        assert_eq!(github_repository("github.com/foo"), None);
        assert_eq!(github_repository("github.com/foo/"), None);
        assert_eq!(github_repository("golang.org/x/net"), None);
    }

    #[test]
    fn tags_are_shortened() {
        let tags = parse_tags(TAGS).unwrap();
        assert_eq!(
            tags,
            TagIndex::from([
                ("v1.0.0".to_owned(), "0123456789ab".to_owned()),
                ("v1.1.0".to_owned(), "abcdef123456".to_owned()),
            ])
        );
    }

    #[test]
    fn malformed_tags() {
        assert!(parse_tags(r#"{"message": "Not Found"}"#).is_err());
        assert!(parse_tags(r#"[{"name": "v1"}]"#).is_err());
    }

    #[test]
    fn credentials_need_both_parts() {
        assert_eq!(Credentials::new(Some("user".into()), None), None);
        assert_eq!(Credentials::new(Some("user".into()), Some(String::new())), None);
        assert_eq!(Credentials::new(None, Some("token".into())), None);
        assert_eq!(
            Credentials::new(Some("user".into()), Some("token".into())),
            Some(Credentials {
                username: "user".into(),
                password: "token".into()
            })
        );
    }

    #[test]
    fn offline_resolves_nothing() {
        assert!(Offline.resolve("github.com/foo/bar").unwrap().is_none());
    }

    #[test]
    fn other_hosts_are_not_requested() {
        let resolver = GitHubTags::new("http://127.0.0.1:1", None).unwrap();
        assert!(resolver.resolve("golang.org/x/net").unwrap().is_none());
    }

    #[test]
    fn fetches_tags() {
        let (url, request) = serve_once("200 OK", TAGS);
        let credentials = Credentials::new(Some("user".into()), Some("token".into()));
        let resolver = local_resolver(&format!("{url}/"), credentials);

        let tags = resolver.resolve("github.com/foo/bar/v2").unwrap().unwrap();
        assert_eq!(tags["v1.1.0"], "abcdef123456");

        let request = request.join().unwrap();
        assert!(request.starts_with("GET /repos/foo/bar/tags?per_page=100 HTTP/1.1\r\n"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("authorization: basic dxnlcjp0b2tlbg==")
        );
        assert!(request.to_ascii_lowercase().contains("user-agent: gopkg-moddiff/test"));
    }

    #[test]
    fn error_status() {
        let (url, _request) = serve_once("401 Unauthorized", r#"{"message": "Bad credentials"}"#);
        let resolver = local_resolver(&url, None);

        let err = resolver.resolve("github.com/foo/bar").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Status { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
    }

    #[test]
    fn malformed_response() {
        let (url, _request) = serve_once("200 OK", r#"{"message": "?"}"#);
        let resolver = local_resolver(&url, None);

        let err = resolver.resolve("github.com/foo/bar").unwrap_err();
        assert!(matches!(err, ResolveError::Decode { .. }));
    }

    #[test]
    fn unreachable_api() {
        let resolver = local_resolver("http://127.0.0.1:1", None);
        let err = resolver.resolve("github.com/foo/bar").unwrap_err();
        assert!(matches!(err, ResolveError::Request { .. }));
    }
}
