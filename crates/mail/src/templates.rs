//! Transactional mail templates with `{{placeholder}}` interpolation.

use immopilot_core::template::render;

/// Subject line for the payment confirmation mail.
const PAYMENT_CONFIRMATION_SUBJECT: &str = "Zahlung erhalten: {{title}}";

/// Body of the payment confirmation mail sent after a successful checkout.
const PAYMENT_CONFIRMATION_BODY: &str = "\
Guten Tag,

vielen Dank fuer Ihre Zahlung. Ihre Anzeige \"{{title}}\" wird jetzt an die \
Immobilienportale uebertragen und ist in Kuerze online.

Laufzeit: {{runtime_days}} Tage

Mit freundlichen Gruessen
Ihr Immopilot-Team
";

/// Subject line for the publication mail.
const LISTING_PUBLISHED_SUBJECT: &str = "Ihre Anzeige ist online: {{title}}";

/// Body of the mail sent once the syndication worker activated a listing.
const LISTING_PUBLISHED_BODY: &str = "\
Guten Tag,

Ihre Anzeige \"{{title}}\" wurde veroeffentlicht und laeuft bis zum \
{{expires_at}}.

Mit freundlichen Gruessen
Ihr Immopilot-Team
";

/// A rendered mail, ready to hand to the mailer.
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Render the payment confirmation mail for a listing.
pub fn payment_confirmation(title: &str, runtime_days: i32) -> RenderedMail {
    let runtime = runtime_days.to_string();
    let vars = [("title", title), ("runtime_days", runtime.as_str())];
    RenderedMail {
        subject: render(PAYMENT_CONFIRMATION_SUBJECT, &vars),
        body: render(PAYMENT_CONFIRMATION_BODY, &vars),
    }
}

/// Render the publication mail for an activated listing.
pub fn listing_published(title: &str, expires_at: &str) -> RenderedMail {
    let vars = [("title", title), ("expires_at", expires_at)];
    RenderedMail {
        subject: render(LISTING_PUBLISHED_SUBJECT, &vars),
        body: render(LISTING_PUBLISHED_BODY, &vars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_confirmation_interpolates() {
        let mail = payment_confirmation("3-Zimmer-Wohnung in Mainz", 90);
        assert_eq!(mail.subject, "Zahlung erhalten: 3-Zimmer-Wohnung in Mainz");
        assert!(mail.body.contains("\"3-Zimmer-Wohnung in Mainz\""));
        assert!(mail.body.contains("Laufzeit: 90 Tage"));
        assert!(!mail.body.contains("{{"));
    }

    #[test]
    fn listing_published_interpolates() {
        let mail = listing_published("Baugrundstueck", "30.11.2026");
        assert_eq!(mail.subject, "Ihre Anzeige ist online: Baugrundstueck");
        assert!(mail.body.contains("30.11.2026"));
        assert!(!mail.body.contains("{{"));
    }
}
