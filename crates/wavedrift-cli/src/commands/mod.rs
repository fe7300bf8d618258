pub mod live;
pub mod palette;
pub mod simulate;
pub mod snapshot;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use wavedrift_core::{
    EngineConfig, Host, ManualScheduler, Size, StyleStore, Theme, Viewport, ViewportEvents,
};

/// Marquee content when `--tags` is not given.
pub const DEFAULT_TAGS: &[&str] = &[
    "Rust",
    "WebAssembly",
    "Python",
    "TypeScript",
    "SQL",
    "Bash",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Prometheus",
    "PostgreSQL",
    "Kafka",
    "GraphQL",
    "Playwright",
];

/// Load a tuning file, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p).with_context(|| format!("loading tuning file {p}")),
        None => Ok(EngineConfig::default()),
    }
}

/// Parse `"10,20,-5"` into deltas. Empty input is an empty script.
pub fn parse_scroll_script(script: &str) -> Result<Vec<f64>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let v: f64 = s
                .parse()
                .with_context(|| format!("invalid scroll delta '{s}'"))?;
            if !v.is_finite() {
                bail!("scroll delta '{s}' is not finite");
            }
            Ok(v)
        })
        .collect()
}

/// Split `--tags`, falling back to [`DEFAULT_TAGS`].
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = tags
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if parsed.is_empty() {
        DEFAULT_TAGS.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}

/// Fixed-size page for headless runs. Scroll position is set by the caller.
pub struct HeadlessPage {
    pub size: Size,
    pub scroll: Cell<f64>,
}

impl Viewport for HeadlessPage {
    fn size(&self) -> Size {
        self.size
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }
}

/// Host backed by a [`HeadlessPage`] and a manual scheduler.
pub fn headless_host(
    size: Size,
    theme: Theme,
    config: EngineConfig,
) -> (Host, Rc<HeadlessPage>, Rc<ManualScheduler>) {
    let page = Rc::new(HeadlessPage {
        size,
        scroll: Cell::new(0.0),
    });
    let scheduler = Rc::new(ManualScheduler::new());
    let host = Host {
        viewport: page.clone(),
        events: Rc::new(ViewportEvents::new()),
        style: Rc::new(StyleStore::with_theme(theme)),
        scheduler: scheduler.clone(),
        config,
    };
    (host, page, scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn scroll_script_parses_signed_values() {
        assert_eq!(parse_scroll_script("10, 20,-5").unwrap(), vec![10.0, 20.0, -5.0]);
        assert!(parse_scroll_script("").unwrap().is_empty());
        assert_eq!(parse_scroll_script("1.5,,2").unwrap(), vec![1.5, 2.0]);
    }

    #[test]
    fn scroll_script_rejects_garbage() {
        assert!(parse_scroll_script("10,up").is_err());
        assert!(parse_scroll_script("inf").is_err());
    }

    #[test]
    fn tags_fall_back_to_defaults() {
        assert_eq!(parse_tags(None).len(), DEFAULT_TAGS.len());
        assert_eq!(parse_tags(Some(" , ")).len(), DEFAULT_TAGS.len());
        assert_eq!(parse_tags(Some("a, b")), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn load_config_default_and_file() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());

        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"waveform": {{"line_count": 3}}}}"#).unwrap();
        let path = f.path().to_str().unwrap().to_string();
        assert_eq!(load_config(Some(&path)).unwrap().waveform.line_count, 3);

        let err = load_config(Some("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("loading tuning file"));
    }
}
