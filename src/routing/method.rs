//! HTTP method inference from handler file stems.
//!
//! # Design Decisions
//! - Matching is exact and case-sensitive: `get` matches, `GET` and `Get` do not
//! - Only the five methods a handler file may declare are representable

use std::fmt;

use axum::http::Method;
use axum::routing::MethodFilter;

/// A method a handler file can declare through its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlerMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HandlerMethod {
    /// All recognized methods, in declaration order.
    pub const ALL: [HandlerMethod; 5] = [
        HandlerMethod::Get,
        HandlerMethod::Post,
        HandlerMethod::Put,
        HandlerMethod::Delete,
        HandlerMethod::Patch,
    ];

    /// Resolve a file stem to a method. Returns `None` for anything that is
    /// not exactly one of the lowercase method names.
    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    /// The lowercase file stem for this method.
    pub fn stem(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
        }
    }

    /// The uppercase wire name (`GET`, `POST`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    pub fn to_http(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
            Self::Patch => Method::PATCH,
        }
    }

    pub(crate) fn filter(&self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Delete => MethodFilter::DELETE,
            Self::Patch => MethodFilter::PATCH,
        }
    }
}

impl fmt::Display for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
