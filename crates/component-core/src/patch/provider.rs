//! Provider wrap anchor: import a provider and wrap `{children}` inside `<body>`

use super::{Anchor, AnchorEdit};
use regex::Regex;
use std::sync::LazyLock;

/// First `<body ...>` through the first following `</body>`
static BODY_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(<body.*?>)(.*?)(</body>)").unwrap());

const IMPORT_PREFIX: &str = "import";
const CHILDREN: &str = "{children}";

/// Wraps a root layout's children in `<Provider>` and imports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderWrap {
    provider: String,
    module: String,
}

impl ProviderWrap {
    pub fn new(provider: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            module: module.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    fn import_line(&self) -> String {
        format!("import {{ {} }} from '{}'", self.provider, self.module)
    }

    fn open_tag(&self) -> String {
        format!("<{}>", self.provider)
    }

    fn close_tag(&self) -> String {
        format!("</{}>", self.provider)
    }

    fn has_open_tag(&self, text: &str) -> bool {
        text.contains(&self.open_tag()) || text.contains(&format!("<{} ", self.provider))
    }

    /// Insert the import after the leading block of `import` lines
    fn inject_import(&self, source: &str) -> String {
        let mut lines: Vec<&str> = source.split('\n').collect();
        let insert_at = lines
            .iter()
            .position(|line| !line.starts_with(IMPORT_PREFIX))
            .unwrap_or(lines.len());
        let import = self.import_line();
        lines.insert(insert_at, &import);
        lines.join("\n")
    }

    /// Wrap the first `{children}` inside the body region; `None` when there is nothing to wrap
    fn wrap_children(&self, source: &str) -> Option<String> {
        let caps = BODY_REGION.captures(source)?;
        let region = caps.get(0)?;
        let inner = caps.get(2)?.as_str();
        if self.has_open_tag(inner) || !inner.contains(CHILDREN) {
            return None;
        }

        let wrapped = format!("{}{}{}", self.open_tag(), CHILDREN, self.close_tag());
        let inner = inner.replacen(CHILDREN, &wrapped, 1);
        Some(format!(
            "{}{}{}{}{}",
            &source[..region.start()],
            &caps[1],
            inner,
            &caps[3],
            &source[region.end()..]
        ))
    }
}

impl Anchor for ProviderWrap {
    fn describe(&self) -> String {
        format!("<{}> wrap", self.provider)
    }

    fn is_applied(&self, source: &str) -> bool {
        source.contains(&self.provider)
    }

    fn apply(&self, source: &str) -> AnchorEdit {
        let mut content = source.to_string();
        let mut steps = Vec::new();
        let mut caveats = Vec::new();

        if self.is_applied(source) {
            return AnchorEdit {
                content,
                steps,
                caveats,
            };
        }

        if !content.contains(&self.module) {
            content = self.inject_import(&content);
            steps.push(format!("Imported {} from '{}'", self.provider, self.module));
        }

        match self.wrap_children(&content) {
            Some(wrapped) => {
                content = wrapped;
                steps.push(format!("Wrapped layout children with {}", self.open_tag()));
            }
            None if self.has_open_tag(&content) => {}
            None => caveats.push(format!(
                "no {} found inside <body>; children were not wrapped with {}",
                CHILDREN,
                self.open_tag()
            )),
        }

        AnchorEdit {
            content,
            steps,
            caveats,
        }
    }

    fn verify(&self, patched: &str) -> Vec<String> {
        let opens = patched.matches(&self.open_tag()).count()
            + patched.matches(&format!("<{} ", self.provider)).count();
        let closes = patched.matches(&self.close_tag()).count();
        if opens == closes {
            Vec::new()
        } else {
            vec![format!(
                "{} opening and {} closing {} tags after patch",
                opens, closes, self.provider
            )]
        }
    }
}
