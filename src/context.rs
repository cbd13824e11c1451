//! Request contexts selectable through `$ctx`.

use bitflags::bitflags;
use std::fmt;

use crate::{Error, Result};

/// Context is a named facet of an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Context {
    Http = 1,
    Path = 2,
    UrlEncoded = 3,
    Headers = 4,
    Json = 5,
    JsonObject = 6,
    JsonArray = 7,
    Cookie = 8,
    Base64 = 9,
    Base64Url = 10,
    AuthHeader = 11,
    Jwt = 12,
}

impl Context {
    /// All contexts in code order.
    pub const ALL: [Context; 12] = [
        Context::Http,
        Context::Path,
        Context::UrlEncoded,
        Context::Headers,
        Context::Json,
        Context::JsonObject,
        Context::JsonArray,
        Context::Cookie,
        Context::Base64,
        Context::Base64Url,
        Context::AuthHeader,
        Context::Jwt,
    ];

    /// Parse a context name (exact match, no surrounding whitespace).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ctx| ctx.as_str() == s)
    }

    /// Get the name used in rule text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Http => "http",
            Context::Path => "path",
            Context::UrlEncoded => "urlenc",
            Context::Headers => "headers",
            Context::Json => "json",
            Context::JsonObject => "json_obj",
            Context::JsonArray => "json_array",
            Context::Cookie => "cookie",
            Context::Base64 => "base64",
            Context::Base64Url => "base64_url",
            Context::AuthHeader => "auth_header",
            Context::Jwt => "jwt",
        }
    }

    /// Context code; the mask bit is `1 << code`.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

bitflags! {
    /// Union of contexts, serialized as the u64 payload of a `$ctx` statement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextSet: u64 {
        const HTTP = 1 << 1;
        const PATH = 1 << 2;
        const URLENC = 1 << 3;
        const HEADERS = 1 << 4;
        const JSON = 1 << 5;
        const JSON_OBJ = 1 << 6;
        const JSON_ARRAY = 1 << 7;
        const COOKIE = 1 << 8;
        const BASE64 = 1 << 9;
        const BASE64_URL = 1 << 10;
        const AUTH_HEADER = 1 << 11;
        const JWT = 1 << 12;
    }
}

impl ContextSet {
    /// Parse a `|`-separated context list such as `"json_obj | json_array"`.
    ///
    /// Names are trimmed; duplicates are harmless. Any unknown name, including
    /// an empty one, fails the whole list.
    pub fn parse_list(list: &str) -> Result<Self> {
        list.split('|').try_fold(ContextSet::empty(), |set, name| {
            let name = name.trim();
            Context::parse(name)
                .map(|ctx| set | ContextSet::from(ctx))
                .ok_or_else(|| Error::UnknownContext(name.to_string()))
        })
    }

    /// Contexts in this set, in code order.
    pub fn contexts(&self) -> impl Iterator<Item = Context> + '_ {
        Context::ALL
            .into_iter()
            .filter(move |ctx| self.contains(ContextSet::from(*ctx)))
    }

    /// Render as the canonical `|`-joined list, in code order.
    pub fn to_list(&self) -> String {
        self.contexts()
            .map(|ctx| ctx.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl From<Context> for ContextSet {
    fn from(ctx: Context) -> Self {
        ContextSet::from_bits_retain(1 << ctx.code())
    }
}
