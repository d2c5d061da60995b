//! Minijinja template engine configuration with compile-time embedded templates.

use minijinja::Environment;

/// Build the template environment with the registration flow templates
pub fn build_env() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("registration.html", include_str!("../templates/registration.html"))?;
    env.add_template("close.html", include_str!("../templates/close.html"))?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_registration_template_escapes_endpoint() {
        let env = build_env().unwrap();
        let rendered = env
            .get_template("registration.html")
            .unwrap()
            .render(context! { endpoint => "https://lms.example/cfg?a=1&b=\"2\"" })
            .unwrap();

        assert!(rendered.contains("action=\"/continue-registration\""));
        assert!(rendered.contains("name=\"tool_name\""));
        // Minijinja HTML-escapes the injected endpoint value.
        assert!(rendered.contains("&amp;b=&quot;2&quot;"));
        assert!(!rendered.contains("b=\"2\""));
    }

    #[test]
    fn test_close_template_posts_close_subject() {
        let env = build_env().unwrap();
        let rendered = env
            .get_template("close.html")
            .unwrap()
            .render(context! {})
            .unwrap();
        assert!(rendered.contains("org.imsglobal.lti.close"));
        assert!(rendered.contains("window.opener || window.parent"));
    }
}
