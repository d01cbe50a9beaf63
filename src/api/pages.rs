use crate::error::Error;
use minijinja::{context, Environment};

/// Pages behind the session gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Dashboard,
    Cameras,
    Zones,
    Alerts,
    Settings,
    Snapshots,
    Mobile,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Index,
        Page::Dashboard,
        Page::Cameras,
        Page::Zones,
        Page::Alerts,
        Page::Settings,
        Page::Snapshots,
        Page::Mobile,
    ];

    pub fn template(&self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Dashboard => "dashboard.html",
            Page::Cameras => "cameras.html",
            Page::Zones => "zones.html",
            Page::Alerts => "alerts.html",
            Page::Settings => "settings.html",
            Page::Snapshots => "snapshots.html",
            Page::Mobile => "mobile.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Index => "Home",
            Page::Dashboard => "Dashboard",
            Page::Cameras => "Cameras",
            Page::Zones => "Zones",
            Page::Alerts => "Alerts",
            Page::Settings => "Settings",
            Page::Snapshots => "Snapshots",
            Page::Mobile => "Mobile",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Page::Index | Page::Dashboard => "",
            Page::Cameras => "Camera sources reporting detections and motion events.",
            Page::Zones => "Detection zones per camera.",
            Page::Alerts => "Recent alerts.",
            Page::Settings => "Dashboard settings.",
            Page::Snapshots => "Saved camera snapshots.",
            Page::Mobile => "Compact view for small screens.",
        }
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("cameras.html", include_str!("../../templates/cameras.html")),
    ("zones.html", include_str!("../../templates/zones.html")),
    ("alerts.html", include_str!("../../templates/alerts.html")),
    ("settings.html", include_str!("../../templates/settings.html")),
    ("snapshots.html", include_str!("../../templates/snapshots.html")),
    ("mobile.html", include_str!("../../templates/mobile.html")),
];

/// HTML renderer over the embedded templates
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, page: Page) -> Result<String, Error> {
        let template = self.env.get_template(page.template())?;
        let html = template.render(context! {
            title => page.title(),
            description => page.description(),
            show_nav => true,
        })?;
        Ok(html)
    }

    /// The login form, with `error` shown above it when set
    pub fn render_login(&self, error: Option<&str>) -> Result<String, Error> {
        let template = self.env.get_template("login.html")?;
        let html = template.render(context! {
            title => "Log in",
            error => error,
            show_nav => false,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_page_renders() {
        let pages = PageRenderer::new().unwrap();
        for page in Page::ALL {
            let html = pages.render(page).unwrap();
            assert!(html.contains(page.title()), "{:?}", page);
            assert!(html.contains("href=\"/logout\""));
        }
    }

    #[test]
    fn test_login_error_is_optional_and_escaped() {
        let pages = PageRenderer::new().unwrap();

        let plain = pages.render_login(None).unwrap();
        assert!(!plain.contains("class=\"error\""));
        assert!(plain.contains("action=\"/login\""));

        let with_error = pages.render_login(Some("<b>nope</b>")).unwrap();
        assert!(with_error.contains("class=\"error\""));
        assert!(with_error.contains("&lt;b&gt;nope&lt;"));
        assert!(!with_error.contains("<b>"));
    }
}
