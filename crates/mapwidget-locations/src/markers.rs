//! Marker icon URL resolution.

use mapwidget_core::{AppSettings, MarkerChoice, MarkerImages, WidgetConfiguration};
use url::Url;

/// Resolves marker image references into display URLs.
///
/// Absolute references (anything with a scheme, such as `https:` or `data:`)
/// are used as given. Relative ones are resolved against the application
/// URL, which is used verbatim when empty or unparsable. A blank reference
/// falls back to the default marker icon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerUrls {
    app_url: String,
    default_icon: Option<String>,
}

impl MarkerUrls {
    #[must_use]
    pub fn new(app_url: impl Into<String>, default_icon: Option<String>) -> Self {
        Self {
            app_url: app_url.into(),
            default_icon: default_icon.filter(|icon| !icon.trim().is_empty()),
        }
    }

    /// The widget's own default icon wins over the process-wide one.
    #[must_use]
    pub fn from_settings(config: &WidgetConfiguration, settings: &AppSettings) -> Self {
        let default_icon = config
            .default_marker_icon
            .clone()
            .filter(|icon| !icon.trim().is_empty())
            .or_else(|| settings.default_marker_icon.clone());
        Self::new(settings.app_url.clone(), default_icon)
    }

    /// Display URL for an image reference; empty when neither the reference
    /// nor a default icon is available.
    #[must_use]
    pub fn display_url(&self, image: &str) -> String {
        let image = image.trim();
        if !image.is_empty() {
            return self.join(image);
        }
        self.default_icon
            .as_deref()
            .map(|icon| self.join(icon.trim()))
            .unwrap_or_default()
    }

    /// URL for the marker image registered under `key`, or an empty string
    /// when no entry matches.
    #[must_use]
    pub fn for_key(&self, images: &MarkerImages, key: &str) -> String {
        images
            .find(key)
            .map(|image| self.display_url(&image.enum_image))
            .unwrap_or_default()
    }

    /// URL for a static location's marker choice.
    #[must_use]
    pub fn for_choice(&self, images: &MarkerImages, choice: &MarkerChoice) -> Option<String> {
        let url = match choice {
            MarkerChoice::Default => self.display_url(""),
            MarkerChoice::Custom { image } => self.display_url(image),
            MarkerChoice::Enumeration { key } => self.for_key(images, key),
        };
        Some(url).filter(|u| !u.is_empty())
    }

    fn join(&self, reference: &str) -> String {
        if Url::parse(reference).is_ok() {
            return reference.to_string();
        }
        match Url::parse(self.app_url.trim()).and_then(|base| base.join(reference)) {
            Ok(url) => url.to_string(),
            Err(error) => {
                if !self.app_url.trim().is_empty() {
                    tracing::debug!(
                        app_url = %self.app_url,
                        reference,
                        %error,
                        "cannot resolve marker image against app url"
                    );
                }
                reference.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mapwidget_core::MarkerImage;

    use super::*;

    fn images() -> MarkerImages {
        MarkerImages::from(vec![
            MarkerImage {
                enum_key: "shop".to_string(),
                enum_image: "img/shop.png".to_string(),
            },
            MarkerImage {
                enum_key: "blank".to_string(),
                enum_image: String::new(),
            },
        ])
    }

    fn urls() -> MarkerUrls {
        MarkerUrls::new(
            "https://app.example.com/",
            Some("img/default.png".to_string()),
        )
    }

    #[test]
    fn joins_relative_reference_onto_app_url() {
        assert_eq!(
            urls().display_url("/img/pin.png"),
            "https://app.example.com/img/pin.png"
        );
    }

    #[test]
    fn resolves_parent_segments_and_page_paths() {
        let urls = MarkerUrls::new("https://app.example.com/widgets/index.html", None);
        assert_eq!(
            urls.display_url("img/pin.png"),
            "https://app.example.com/widgets/img/pin.png"
        );
        assert_eq!(
            urls.display_url("../img/pin.png"),
            "https://app.example.com/img/pin.png"
        );
    }

    #[test]
    fn scheme_relative_reference_takes_app_scheme() {
        assert_eq!(
            urls().display_url("//cdn.example.com/pin.png"),
            "https://cdn.example.com/pin.png"
        );
    }

    #[test]
    fn unparsable_app_url_keeps_reference() {
        let urls = MarkerUrls::new("not a url", None);
        assert_eq!(urls.display_url("img/pin.png"), "img/pin.png");
    }

    #[test]
    fn keeps_absolute_reference() {
        assert_eq!(
            urls().display_url("https://cdn.example.com/pin.png"),
            "https://cdn.example.com/pin.png"
        );
        assert_eq!(
            urls().display_url("data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn blank_reference_uses_default_icon() {
        assert_eq!(
            urls().display_url("  "),
            "https://app.example.com/img/default.png"
        );
        assert_eq!(MarkerUrls::default().display_url(""), "");
    }

    #[test]
    fn key_hit_and_miss() {
        assert_eq!(
            urls().for_key(&images(), "shop"),
            "https://app.example.com/img/shop.png"
        );
        assert_eq!(urls().for_key(&images(), "Shop"), "");
        assert_eq!(urls().for_key(&images(), ""), "");
    }

    #[test]
    fn key_hit_with_blank_image_falls_back_to_default() {
        assert_eq!(
            urls().for_key(&images(), "blank"),
            "https://app.example.com/img/default.png"
        );
    }

    #[test]
    fn choice_without_any_icon_is_none() {
        let urls = MarkerUrls::new("", None);
        assert_eq!(urls.for_choice(&images(), &MarkerChoice::Default), None);
        assert_eq!(
            urls.for_choice(
                &images(),
                &MarkerChoice::Enumeration {
                    key: "missing".to_string()
                }
            ),
            None
        );
        assert_eq!(
            urls.for_choice(
                &images(),
                &MarkerChoice::Custom {
                    image: "img/pin.png".to_string()
                }
            ),
            Some("img/pin.png".to_string())
        );
    }

    #[test]
    fn widget_default_icon_wins_over_settings() {
        let config: WidgetConfiguration = serde_json::from_str(
            r#"{"dataSource": {"type": "static"}, "defaultMarkerIcon": "img/widget.png"}"#,
        )
        .unwrap();
        let settings = AppSettings {
            default_marker_icon: Some("img/global.png".to_string()),
            ..AppSettings::default()
        };
        assert_eq!(
            MarkerUrls::from_settings(&config, &settings).display_url(""),
            "img/widget.png"
        );
    }
}
