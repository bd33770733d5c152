use askama::{Error, Template};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailTemplateData {
    pub title: String,
    pub message: String,
    pub button: String,
    pub link: String,
}

#[derive(Template, Debug)]
#[template(path = "email.html")]
pub struct EmailTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub button: &'a str,
    pub link: &'a str,
}

impl<'a> From<&'a EmailTemplateData> for EmailTemplate<'a> {
    fn from(data: &'a EmailTemplateData) -> Self {
        EmailTemplate {
            title: data.title.as_str(),
            message: data.message.as_str(),
            button: data.button.as_str(),
            link: data.link.as_str(),
        }
    }
}

// The rendered data is not logged: verification links embed one-time
// tokens.
pub fn render_email(data: &EmailTemplateData) -> Result<String, Error> {
    let template = EmailTemplate::from(data);
    match template.render() {
        Ok(result) => Ok(result),
        Err(e) => {
            error!("❌ Failed to render email template: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_fields_into_the_body() {
        let data = EmailTemplateData {
            title: "Verify your email".into(),
            message: "Click the button below to activate your account.".into(),
            button: "Verify".into(),
            link: "https://repair.example.com/auth/verify?token=abc&email=a%40b.c".into(),
        };

        let html = render_email(&data).unwrap();
        assert!(html.contains("Verify your email"));
        assert!(html.contains("activate your account"));
        assert!(html.contains("https://repair.example.com/auth/verify?token=abc&email=a%40b.c"));
    }
}
