//! Server-rendered HTML views

mod templates;

use axum::response::Html;
use minijinja::{Environment, UndefinedBehavior, Value};

use crate::error::Result;

/// Template environment holding every page
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        // Forms render before any submission, so missing values must print empty
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.add_filter("date", format_date);

        env.add_template("layout.html", templates::LAYOUT)?;
        env.add_template("posts/index.html", templates::POSTS_INDEX)?;
        env.add_template("posts/show.html", templates::POST_SHOW)?;
        env.add_template("posts/new.html", templates::POST_NEW)?;
        env.add_template("auth/login.html", templates::LOGIN)?;
        env.add_template("auth/logout.html", templates::LOGGED_OUT)?;

        Ok(Self { env })
    }

    /// Render a page with the given context
    pub fn render(&self, name: &str, ctx: Value) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

/// Format an RFC 3339 timestamp as e.g. "Mar 05, 2024"
fn format_date(value: String) -> String {
    chrono::DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_load() {
        assert!(Views::new().is_ok());
    }

    #[test]
    fn test_new_post_form_without_data() {
        let views = Views::new().unwrap();
        let Html(html) = views.render("posts/new.html", context! {}).unwrap();
        assert!(html.contains("name=\"title\""));
        assert!(html.contains("Login"));
    }

    #[test]
    fn test_values_are_escaped() {
        let views = Views::new().unwrap();
        let Html(html) = views
            .render(
                "posts/new.html",
                context! { data => context! { fields => context! { title => "<script>" } } },
            )
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_date_filter() {
        assert_eq!(format_date("2024-03-05T10:00:00Z".to_string()), "Mar 05, 2024");
        assert_eq!(format_date("not a date".to_string()), "not a date");
    }
}
