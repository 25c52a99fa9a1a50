//! Fixed instructions for the three Chrome Web Store listing agents.
//!
//! Each template names its output fields in order, tells the model what to
//! analyze, and carries one literal example answer. Rendering happens once,
//! on first use.

use once_cell::sync::Lazy;

/// One output field and the instruction the model gets for it.
pub type TemplateField = (&'static str, &'static str);

#[derive(Debug)]
pub struct PromptTemplate {
    /// Role statement plus what to analyze, one sentence per line.
    pub header: &'static str,
    pub fields: &'static [TemplateField],
    pub example_output: &'static str,
}

impl PromptTemplate {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn render(&self) -> String {
        let keys = self
            .field_names()
            .iter()
            .map(|name| format!("'{}'", name))
            .collect::<Vec<_>>()
            .join(", ");

        let field_lines = self
            .fields
            .iter()
            .map(|(name, instruction)| format!("- {}: {}", name, instruction))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\
             For each of the following fields, provide a value as described. \
             Return your answers as a JSON object with these keys: [{}].\n\
             {}\n\
             If a field is not applicable, use null or an empty string.\n\
             Here is an example output:\n\
             {}",
            self.header, keys, field_lines, self.example_output
        )
    }
}

const STORE_LISTING_FIELDS: &[TemplateField] = &[
    ("display_name", "Enter the extension's display name. It should be clear and related to the manifest name."),
    ("summary", "Write a concise tagline (max 132 characters) for the extension."),
    ("detailed_description", "Provide a full description of features, benefits, and usage. Use formatting for readability."),
    ("language", "Specify the primary language."),
    ("category", "Choose the most relevant category (e.g., Productivity, Developer Tools)."),
    ("official_website", "Provide the homepage or support page URL."),
    ("support_contact", "Provide a support contact (email or URL)."),
];

const PRIVACY_PRACTICES_FIELDS: &[TemplateField] = &[
    ("single_purpose", "Clearly explain your extension's single core purpose."),
    ("permission_justifications", "For each permission, provide a detailed justification."),
    ("user_data_usage", "Disclose if and how user data is collected/used/shared."),
    ("privacy_policy_url", "Provide a direct link to your privacy policy."),
    ("remote_code", "Disclose if remote code is used."),
    ("content_security_policy", "State your Content Security Policy."),
];

const DISTRIBUTION_FIELDS: &[TemplateField] = &[
    ("visibility", "Choose one: Public, Unlisted, Private."),
    ("countries", "List countries for distribution."),
    ("pricing_payments", "Describe pricing or payment setup if applicable."),
];

pub static STORE_LISTING: PromptTemplate = PromptTemplate {
    header: "You are the Store Listing Agent. Fill out the Chrome Web Store 'Store Listing' tab.\n\
             Based on the repository data provided, analyze the manifest.json, README.md, and \
             repository information to fill out the store listing.",
    fields: STORE_LISTING_FIELDS,
    example_output: r#"{
  "display_name": "Tab Organizer",
  "summary": "Organize your tabs with one click.",
  "detailed_description": "Tab Organizer helps you manage and group your Chrome tabs efficiently. Features include...",
  "language": "en",
  "category": "Productivity",
  "official_website": "https://taborganizer.com",
  "support_contact": "support@taborganizer.com"
}"#,
};

pub static PRIVACY_PRACTICES: PromptTemplate = PromptTemplate {
    header: "You are the Privacy Practices Agent. Fill out the Chrome Web Store 'Privacy Practices' tab.\n\
             Based on the repository data provided, analyze the manifest.json permissions, README.md, \
             and any privacy-related files to assess privacy practices.\n\
             Pay special attention to the permissions requested in manifest.json and any privacy \
             policy or data handling documentation.",
    fields: PRIVACY_PRACTICES_FIELDS,
    example_output: r#"{
  "single_purpose": "Tab Organizer helps users manage browser tabs.",
  "permission_justifications": {"tabs": "Needed to read and organize open tabs."},
  "user_data_usage": {"PII": "No", "analytics": "No"},
  "privacy_policy_url": "https://taborganizer.com/privacy",
  "remote_code": "No",
  "content_security_policy": "script-src 'self'; object-src 'none';"
}"#,
};

pub static DISTRIBUTION: PromptTemplate = PromptTemplate {
    header: "You are the Distribution Agent. Fill out the Chrome Web Store 'Distribution' tab.\n\
             Based on the repository data provided, analyze the project's maturity, popularity \
             (stars), and maintenance status (issues, last update).\n\
             Consider the repository's visibility, documentation quality, and overall readiness \
             for distribution.",
    fields: DISTRIBUTION_FIELDS,
    example_output: r#"{
  "visibility": "Public",
  "countries": ["US", "CA", "GB"],
  "pricing_payments": "Free extension. No payments required."
}"#,
};

static STORE_LISTING_PROMPT: Lazy<String> = Lazy::new(|| STORE_LISTING.render());
static PRIVACY_PRACTICES_PROMPT: Lazy<String> = Lazy::new(|| PRIVACY_PRACTICES.render());
static DISTRIBUTION_PROMPT: Lazy<String> = Lazy::new(|| DISTRIBUTION.render());

/// The listing tabs, in the order the agents run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSection {
    StoreListing,
    PrivacyPractices,
    Distribution,
}

impl ListingSection {
    pub const ALL: [ListingSection; 3] = [
        ListingSection::StoreListing,
        ListingSection::PrivacyPractices,
        ListingSection::Distribution,
    ];

    /// Rendered system prompt for this section's agent.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::StoreListing => STORE_LISTING_PROMPT.as_str(),
            Self::PrivacyPractices => PRIVACY_PRACTICES_PROMPT.as_str(),
            Self::Distribution => DISTRIBUTION_PROMPT.as_str(),
        }
    }

    pub fn agent_name(self) -> &'static str {
        match self {
            Self::StoreListing => "Store Listing Agent",
            Self::PrivacyPractices => "Privacy Practices Agent",
            Self::Distribution => "Distribution Agent",
        }
    }

    /// Header printed above the agent's output.
    pub fn heading(self) -> String {
        format!("=== {} Output ===", self.agent_name())
    }
}
