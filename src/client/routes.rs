use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{id}`: a decimal id.
    Id,
    /// Any other `{name}`: one non-empty segment.
    Param,
}

/// A method and path pattern that needs a wallet identity, e.g.
/// `POST /posts/{id}/likes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRoute {
    method: Method,
    segments: Vec<Segment>,
}

impl AuthRoute {
    pub fn new(method: Method, pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment {
                "{id}" => Segment::Id,
                s if s.starts_with('{') && s.ends_with('}') => Segment::Param,
                s => Segment::Literal(s.to_string()),
            })
            .collect();

        Self { method, segments }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if &self.method != method {
            return false;
        }

        let mut parts = split_path(path);
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            let ok = match segment {
                Segment::Literal(literal) => part == literal,
                Segment::Id => part.bytes().all(|b| b.is_ascii_digit()),
                Segment::Param => true,
            };
            if !ok {
                return false;
            }
        }

        parts.next().is_none()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_matches('/').split('/').filter(|s| !s.is_empty())
}

/// Write operations of the posting API.
pub fn default_auth_routes() -> Vec<AuthRoute> {
    vec![
        AuthRoute::new(Method::POST, "/posts"),
        AuthRoute::new(Method::POST, "/posts/{id}/likes"),
        AuthRoute::new(Method::POST, "/posts/{id}/comments"),
        AuthRoute::new(Method::POST, "/users/{wallet}"),
    ]
}
