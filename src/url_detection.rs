/// Link detection over terminal buffer text, and opening detected links
//
// # Error Handling Convention
//
// `open_link` returns `Result<(), String>` (a simple string error for
// display in the driver) rather than `anyhow::Error`, so callers can print
// the message directly.
use regex::Regex;
use std::sync::OnceLock;

/// Scheme URLs: news, telnet, nntp, file, http(s), ftp(s) and webcal
static SCHEME_URL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Bare host names starting with `www` or `ftp`
static HOST_REGEX: OnceLock<Regex> = OnceLock::new();

/// E-mail addresses, with or without `mailto:`
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn scheme_url_regex() -> &'static Regex {
    SCHEME_URL_REGEX.get_or_init(|| {
        Regex::new(
            r##"(?:news:|telnet:|nntp:|file:/|https?:|ftps?:|webcal:)//(?:[-[:alnum:]]+(?::[-[:alnum:],?;.:/!%$^*&~"#']+)?@)?[-[:alnum:]]+(?:\.[-[:alnum:]]+)*(?::[0-9]{1,5})?(?:/[-[:alnum:]_$.+!*(),;:@&=?/~#'%]*[^\].> \t\r\n,\\"])?"##,
        )
        .expect("Failed to compile scheme URL regex")
    })
}

fn host_regex() -> &'static Regex {
    HOST_REGEX.get_or_init(|| {
        Regex::new(
            r##"(?:www|ftp)[-[:alnum:]]*\.[-[:alnum:]]+(?:\.[-[:alnum:]]+)*(?::[0-9]{1,5})?(?:/[-[:alnum:]_$.+!*(),;:@&=?/~#%]*[^\]'.>) \t\r\n,\\"])?"##,
        )
        .expect("Failed to compile host regex")
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"(?:mailto:)?[-[:alnum:]][-[:alnum:].]*@[-[:alnum:]]+\.[-[:alnum:]]+(?:\.[-[:alnum:]]+)*")
            .expect("Failed to compile e-mail regex")
    })
}

/// What kind of link was matched; decides how it is normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Has an explicit scheme and opens as-is
    SchemeUrl,
    /// `www.` or `ftp.` host without a scheme
    Host,
    /// E-mail address
    Email,
}

/// A link found in the buffer, with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLink {
    /// The matched text
    pub text: String,
    /// Row in the buffer
    pub row: usize,
    /// Start byte offset within the row
    pub start_col: usize,
    /// End byte offset (exclusive)
    pub end_col: usize,
    pub kind: LinkKind,
}

impl DetectedLink {
    /// The link with a scheme, ready to hand to the system opener
    ///
    /// # Examples
    /// - `"www.example.com"` -> `"http://www.example.com"`
    /// - `"ftp.example.com"` -> `"ftp://ftp.example.com"`
    /// - `"me@example.com"` -> `"mailto:me@example.com"`
    pub fn target(&self) -> String {
        match self.kind {
            LinkKind::SchemeUrl => self.text.clone(),
            LinkKind::Host if self.text.starts_with("ftp") => format!("ftp://{}", self.text),
            LinkKind::Host => format!("http://{}", self.text),
            LinkKind::Email if self.text.starts_with("mailto:") => self.text.clone(),
            LinkKind::Email => format!("mailto:{}", self.text),
        }
    }
}

/// Detect links in one line of text
///
/// Matches never overlap: where two patterns hit the same text, the one
/// starting first wins, then the longer one. This keeps the host part of
/// `https://www.example.com` from being reported twice.
pub fn detect_links(text: &str, row: usize) -> Vec<DetectedLink> {
    let patterns = [
        (LinkKind::SchemeUrl, scheme_url_regex()),
        (LinkKind::Host, host_regex()),
        (LinkKind::Email, email_regex()),
    ];

    let mut candidates: Vec<DetectedLink> = patterns
        .iter()
        .flat_map(|(kind, regex)| {
            regex.find_iter(text).map(move |mat| DetectedLink {
                text: mat.as_str().to_string(),
                row,
                start_col: mat.start(),
                end_col: mat.end(),
                kind: *kind,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.start_col
            .cmp(&b.start_col)
            .then(b.end_col.cmp(&a.end_col))
    });

    let mut links: Vec<DetectedLink> = Vec::with_capacity(candidates.len());
    for link in candidates {
        if links.last().is_none_or(|prev| link.start_col >= prev.end_col) {
            links.push(link);
        }
    }
    links
}

/// Detect links in every row of a buffer, top to bottom
pub fn detect_links_in_buffer<S: AsRef<str>>(lines: &[S]) -> Vec<DetectedLink> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(row, line)| detect_links(line.as_ref(), row))
        .collect()
}

/// Open a link with the system default handler
pub fn open_link(link: &DetectedLink) -> Result<(), String> {
    let target = link.target();
    log::info!("Opening link {}", target);
    open::that(&target).map_err(|e| format!("Failed to open {}: {}", target, e))
}
