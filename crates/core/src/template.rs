//! `{{placeholder}}` interpolation for transactional mail templates.
//!
//! This module lives in `core` (zero internal deps) so it can be used by the
//! mailer and any future CLI tooling.

/// Replace every `{{key}}` occurrence in `template` with its value.
///
/// Placeholders without a matching key are left intact so a missing value is
/// visible in the rendered output instead of silently disappearing.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}
