/// Name of the profile used for any outlet the registry does not know.
pub const GENERAL: &str = "General";

/// Style profile for one target publication.
#[derive(Debug, Clone, PartialEq)]
pub struct OutletStyle {
    pub name: String,
    pub tone: String,
    /// Prose guidance, e.g. "Bold headlines, focus on innovation"
    pub style: String,
    pub typical_length: String,
    /// Instruction handed to the chat model when generation is delegated.
    pub instructions: String,
    pub description: String,
    pub audience: String,
}

/// Outlet name → style profile, with `General` as the catch-all.
#[derive(Debug, Clone)]
pub struct OutletRegistry {
    named: Vec<OutletStyle>,
    general: OutletStyle,
}

impl OutletRegistry {
    /// The four outlets PR-Connect ships with.
    pub fn builtin() -> Self {
        let techcrunch = OutletStyle {
            name: "TechCrunch".into(),
            tone: "Direct, tech-focused, startup-friendly".into(),
            style: "Bold headlines, focus on innovation and market disruption".into(),
            typical_length: "300-500 words".into(),
            instructions: "Write for TechCrunch: punchy and direct, aimed at founders, developers and \
                           investors. Lead with what is new, explain the technology and why it could \
                           disrupt its market, and keep marketing fluff to a minimum."
                .into(),
            description: "Tech-focused, startup-friendly coverage".into(),
            audience: "Developers, entrepreneurs, tech industry".into(),
        };
        let verge = OutletStyle {
            name: "The Verge".into(),
            tone: "Consumer-focused, accessible tech coverage".into(),
            style: "Engaging, lifestyle-oriented tech angle".into(),
            typical_length: "400-600 words".into(),
            instructions: "Write for The Verge: conversational and engaging, aimed at everyday tech \
                           consumers. Focus on what the announcement means for people's daily lives \
                           and avoid corporate jargon."
                .into(),
            description: "Consumer tech and digital lifestyle".into(),
            audience: "Tech consumers, early adopters".into(),
        };
        let forbes = OutletStyle {
            name: "Forbes".into(),
            tone: "Business-focused, executive perspective".into(),
            style: "Professional, market impact, financial implications".into(),
            typical_length: "500-800 words".into(),
            instructions: "Write for Forbes: professional and analytical, aimed at executives and \
                           investors. Emphasise strategy, market impact and financial implications."
                .into(),
            description: "Business and financial perspective".into(),
            audience: "Executives, investors, business leaders".into(),
        };
        let general = OutletStyle {
            name: GENERAL.into(),
            tone: "Balanced, broad appeal".into(),
            style: "Standard press release format, accessible to all audiences".into(),
            typical_length: "400-600 words".into(),
            instructions: "Write a standard wire-service press release in AP style: FOR IMMEDIATE \
                           RELEASE header, dateline, clear lead paragraph, a quote, boilerplate and \
                           a media contact block."
                .into(),
            description: "Broad appeal, standard format".into(),
            audience: "General public, all media outlets".into(),
        };

        Self {
            named: vec![techcrunch, verge, forbes],
            general,
        }
    }

    /// Exact-name lookup. Returns `None` for unknown outlets.
    pub fn get(&self, name: &str) -> Option<&OutletStyle> {
        if name == self.general.name {
            return Some(&self.general);
        }
        self.named.iter().find(|style| style.name == name)
    }

    /// Lookup that never fails: unknown outlets resolve to `General`.
    pub fn resolve(&self, name: &str) -> &OutletStyle {
        self.get(name).unwrap_or(&self.general)
    }

    /// All profiles, `General` last.
    pub fn iter(&self) -> impl Iterator<Item = &OutletStyle> {
        self.named.iter().chain(std::iter::once(&self.general))
    }
}

impl Default for OutletRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_outlet_resolves_to_general() {
        let registry = OutletRegistry::builtin();
        assert_eq!(registry.resolve("Wall Street Journal").name, GENERAL);
        assert!(registry.get("Wall Street Journal").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = OutletRegistry::builtin();
        assert_eq!(registry.resolve("Forbes").name, "Forbes");
        assert_eq!(registry.resolve("forbes").name, GENERAL);
    }

    #[test]
    fn iterates_with_general_last() {
        let names: Vec<_> = OutletRegistry::builtin().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["TechCrunch", "The Verge", "Forbes", "General"]);
    }
}
