//! Icon-library substitution
//!
//! Registry sources ship with lucide icons. When the project is configured
//! for a different library, named icon imports are renamed through the
//! registry's translation table and matching template tags follow. Only
//! icons with a translation for the target library are rewritten; the
//! import source flips to the target library once any of its specifiers
//! changed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::registry::IconTranslations;
use crate::transform::{TransformContext, TransformStage};

/// The registry authors everything against this library
pub const SOURCE_LIBRARY: &str = "lucide";

/// A known icon library and its import path
#[derive(Debug, Clone, Copy)]
pub struct IconLibrary {
    pub name: &'static str,
    pub package: &'static str,
    pub import: &'static str,
}

/// Supported icon libraries, keyed by config name
pub fn icon_libraries() -> &'static [(&'static str, IconLibrary)] {
    &[
        (
            "lucide",
            IconLibrary {
                name: "lucide-vue-next",
                package: "lucide-vue-next",
                import: "lucide-vue-next",
            },
        ),
        (
            "radix",
            IconLibrary {
                name: "@radix-icons/vue",
                package: "@radix-icons/vue",
                import: "@radix-icons/vue",
            },
        ),
        (
            "tabler",
            IconLibrary {
                name: "@tabler/icons-vue",
                package: "@tabler/icons-vue",
                import: "@tabler/icons-vue",
            },
        ),
        (
            "phosphor",
            IconLibrary {
                name: "@phosphor-icons/vue",
                package: "@phosphor-icons/vue",
                import: "@phosphor-icons/vue",
            },
        ),
    ]
}

pub fn icon_library(name: &str) -> Option<&'static IconLibrary> {
    icon_libraries()
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, library)| library)
}

fn named_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\s+(?:type\s+)?\{(?P<names>[^}]*)\}\s*from\s*(?P<q>["'])(?P<spec>[^"']+)["']"#)
            .expect("valid regex")
    })
}

/// Icon-library substitution stage
pub struct IconSubstitute {
    icons: IconTranslations,
}

impl IconSubstitute {
    pub fn new(icons: IconTranslations) -> Self {
        Self { icons }
    }
}

impl TransformStage for IconSubstitute {
    fn name(&self) -> &'static str {
        "icon-substitute"
    }

    fn apply(&self, ctx: &TransformContext, source: &str) -> Result<(String, usize)> {
        let Some(target) = ctx.config.icon_library.as_deref() else {
            return Ok((source.to_string(), 0));
        };
        let Some(target_library) = icon_library(target) else {
            return Ok((source.to_string(), 0));
        };
        if target == SOURCE_LIBRARY {
            return Ok((source.to_string(), 0));
        }

        let known_imports: Vec<&str> = icon_libraries().iter().map(|(_, l)| l.import).collect();

        let mut count = 0;
        // original icon name → target library icon name
        let mut renamed: BTreeMap<String, String> = BTreeMap::new();

        let mut replacements: Vec<(std::ops::Range<usize>, String)> = Vec::new();

        for caps in named_import_re().captures_iter(source) {
            let spec = caps.name("spec").expect("spec group");
            if !known_imports.iter().any(|prefix| spec.as_str().starts_with(prefix)) {
                continue;
            }

            let names = caps.name("names").expect("names group");
            let quote = caps.name("q").map_or("'", |m| m.as_str());

            let mut changed = false;
            let rewritten: Vec<String> = names
                .as_str()
                .split(',')
                .map(|entry| {
                    let trimmed = entry.trim();
                    if trimmed.is_empty() {
                        return entry.to_string();
                    }

                    let (imported, alias_tail) = match trimmed.split_once(" as ") {
                        Some((name, local)) => (name.trim(), Some(local.trim())),
                        None => (trimmed, None),
                    };

                    let Some(translated) = self
                        .icons
                        .get(imported)
                        .and_then(|per_library| per_library.get(target))
                    else {
                        return entry.to_string();
                    };

                    changed = true;
                    renamed.insert(imported.to_string(), translated.clone());

                    match alias_tail {
                        Some(local) => format!(" {translated} as {local}"),
                        None => format!(" {translated}"),
                    }
                })
                .collect();

            if changed {
                count += 1;
                let statement = format!(
                    "import {{{} }} from {quote}{}{quote}",
                    rewritten.join(","),
                    target_library.import
                );
                let full = caps.get(0).expect("match");
                replacements.push((full.range(), statement));
            }
        }

        let mut out = source.to_string();
        for (range, statement) in replacements.into_iter().rev() {
            out.replace_range(range, &statement);
        }

        // Rename matching element tags in the template.
        if !renamed.is_empty() {
            if let Some(start) = out.find("<template") {
                if let Some(end) = out.rfind("</template>").map(|e| e + "</template>".len()) {
                    if end > start {
                        let mut template = out[start..end].to_string();
                        for (original, translated) in &renamed {
                            let tag_re =
                                Regex::new(&format!(r"<(/?){}([\s/>])", regex::escape(original)))
                                    .expect("valid regex");
                            let replaced = tag_re
                                .replace_all(&template, |caps: &regex::Captures| {
                                    count += 1;
                                    format!("<{}{}{}", &caps[1], translated, &caps[2])
                                })
                                .into_owned();
                            template = replaced;
                        }
                        out.replace_range(start..end, &template);
                    }
                }
            }
        }

        Ok((out, count))
    }
}
