//! Deterministic per-outlet press-release skeletons.
//!
//! Output depends only on the brief and the resolved outlet profile, which is
//! what makes it usable as the fallback for delegated generation.

use std::borrow::Cow;

use prconnect_types::messages::PressReleaseRequest;

use crate::outlets::OutletStyle;

/// Brief fields with defaults applied for anything left blank.
struct Fields<'a> {
    title: Cow<'a, str>,
    company: &'a str,
    category: &'a str,
    body: &'a str,
    body_lower: String,
    notes: Option<&'a str>,
    contact: Option<&'a str>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<'a> Fields<'a> {
    fn from_brief(brief: &'a PressReleaseRequest) -> Self {
        let company = non_blank(Some(&brief.company_name)).unwrap_or("Company");
        let title = match non_blank(Some(&brief.title)) {
            Some(title) => Cow::Borrowed(title),
            None => Cow::Owned(format!("Press Release from {company}")),
        };
        let body = non_blank(Some(&brief.body)).unwrap_or("No content provided");

        Self {
            title,
            company,
            category: non_blank(Some(&brief.category)).unwrap_or("Company Milestone"),
            body,
            body_lower: body.to_lowercase(),
            notes: non_blank(brief.additional_notes.as_deref()),
            contact: non_blank(brief.contact_info.as_deref()),
        }
    }

    fn mentions(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.body_lower.contains(k))
    }

    fn press_email(&self, mailbox: &str) -> String {
        let domain: String = self
            .company
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let domain = if domain.is_empty() { "company" } else { domain.as_str() };
        format!("{mailbox}@{domain}.com")
    }
}

/// Render the fixed skeleton for `style`. Unknown outlets have already been
/// resolved to `General` by the registry, so anything unmatched here gets the
/// general wire format.
pub fn render(brief: &PressReleaseRequest, style: &OutletStyle) -> String {
    let fields = Fields::from_brief(brief);
    match style.name.as_str() {
        "TechCrunch" => techcrunch(&fields),
        "The Verge" => the_verge(&fields),
        "Forbes" => forbes(&fields),
        _ => general(&fields),
    }
}

fn techcrunch(f: &Fields<'_>) -> String {
    let title_lower = f.title.to_lowercase();
    let announcement = if f.mentions(&["launch"]) {
        format!("unveiled {title_lower}")
    } else if f.mentions(&["funding", "investment"]) {
        format!("raised fresh capital to accelerate {title_lower}")
    } else if f.mentions(&["partnership"]) {
        format!("struck a strategic partnership around {title_lower}")
    } else {
        format!("announced {title_lower}")
    };
    let category = f.category.to_lowercase();

    [
        format!("**{}**", f.title),
        format!(
            "{} today {announcement}, a milestone in the company's push into the tech ecosystem.",
            f.company
        ),
        format!("> {}", f.body),
        [
            "**Key Highlights:**",
            "• Technology-first approach aimed squarely at market disruption",
            "• Architecture built to scale with rapid user adoption",
            "• Developer-friendly from day one, with enterprise-grade security",
        ]
        .join("\n"),
        format!(
            "**Why It Matters:**\nThis {category} shows {} pushing on what its technology can do, \
             targeting real pain points without sacrificing flexibility or performance.",
            f.company
        ),
        format!(
            "**Market Impact:**\nThe move is expected to strengthen {}'s position against \
             incumbents and could reset expectations for products in its space.",
            f.company
        ),
        format!(
            "**Additional Information:**\n{}",
            f.notes
                .unwrap_or("Technical documentation and developer resources will follow on the company site.")
        ),
        format!(
            "**Media Contact:**\n{}",
            f.contact
                .map(str::to_string)
                .unwrap_or_else(|| format!("Press inquiries: {}", f.press_email("press")))
        ),
        "*Written for TechCrunch's startup and innovation audience.*".to_string(),
    ]
    .join("\n\n")
}

fn the_verge(f: &Fields<'_>) -> String {
    let angle = if f.mentions(&["app", "platform"]) {
        "a new way to interact with the technology people use every day"
    } else if f.mentions(&["service"]) {
        "a reworked service experience"
    } else if f.mentions(&["product"]) {
        "a product that could change how we think about everyday gadgets"
    } else {
        "an idea that sits right where technology meets daily life"
    };
    let category = f.category.to_lowercase();

    [
        format!("# {}", f.title),
        format!(
            "{} is introducing {angle}, and it is the kind of move that says a lot about where \
             consumer tech is heading.",
            f.company
        ),
        format!("## What This Means for You\n\n{}", f.body),
        format!(
            "## The Experience Comes First\n\nThis {category} is less about datasheets and more \
             about how it feels to use. {} appears to understand that the best technology gets out \
             of the way.",
            f.company
        ),
        format!(
            "## The Bigger Picture\n\nPeople expect more from their devices and services than ever. \
             Announcements like this one from {} show companies trying to close the gap between what \
             technology can do and what people actually want from it.",
            f.company
        ),
        format!(
            "## Additional Context\n{}",
            f.notes
                .unwrap_or("We'll keep following this story and how users respond.")
        ),
        format!(
            "**Press Contact:** {}",
            f.contact.unwrap_or("Media inquiries welcomed via official channels")
        ),
        "*Written for The Verge's consumer-tech readers.*".to_string(),
    ]
    .join("\n\n")
}

fn forbes(f: &Fields<'_>) -> String {
    let initiative = if f.mentions(&["funding"]) {
        "capital allocation strategy"
    } else if f.mentions(&["launch"]) {
        "market expansion initiative"
    } else if f.mentions(&["partnership"]) {
        "strategic alliance"
    } else {
        "business development strategy"
    };
    let category = f.category.to_lowercase();

    [
        format!(
            "**{}**\n*{} Strengthens Its Market Position With a Strategic {}*",
            f.title, f.company, f.category
        ),
        format!(
            "**Executive Summary**\n\n{} today detailed its latest {initiative}, underscoring a \
             commitment to sustainable growth and market leadership. {}",
            f.company, f.body
        ),
        format!(
            "**Strategic Business Impact**\n\nThis {category} is positioned to deliver:\n\
             • Consolidation and expansion of market position\n\
             • Operational efficiency across core business lines\n\
             • Long-term shareholder value creation\n\
             • Clear competitive differentiation"
        ),
        format!(
            "**Market Analysis**\n\nThe timing reflects {}'s read of a market inflection point. \
             Analysts suggest the {category} lets the company capture emerging demand while \
             containing sector-specific risk.",
            f.company
        ),
        format!(
            "**Leadership Perspective**\n\nThe {category} fits {}'s stated strategy of disciplined \
             growth, the kind of execution institutional investors reward.",
            f.company
        ),
        format!(
            "**Investment Considerations**\n{}",
            f.notes.unwrap_or(
                "Further financial detail will be shared in upcoming investor communications."
            )
        ),
        format!(
            "**Investor Relations:** {}",
            f.contact
                .map(str::to_string)
                .unwrap_or_else(|| f.press_email("investor.relations"))
        ),
        "*Prepared for Forbes' executive and investor readership.*".to_string(),
    ]
    .join("\n\n")
}

fn general(f: &Fields<'_>) -> String {
    let category = f.category.to_lowercase();

    [
        "FOR IMMEDIATE RELEASE".to_string(),
        format!("**{}**", f.title),
        format!("{} Announces {}", f.company, f.category),
        format!(
            "**[City, State] – [Date]** – {} today announced a {category}, the latest step in its \
             mission to deliver innovative solutions and lasting value. {}",
            f.company, f.body
        ),
        format!(
            "**Key Highlights:**\n\n\
             • **What:** {} by {}\n\
             • **Impact:** Stronger capabilities and market position\n\
             • **Timeline:** Effective immediately\n\
             • **Scope:** Company-wide initiative",
            f.category, f.company
        ),
        format!(
            "\"We are pleased to share this {category} with our customers, partners and community,\" \
             said a spokesperson for {}. \"It reflects our long-term vision and our commitment to \
             the people we serve.\"",
            f.company
        ),
        format!(
            "**About {}:**\n\n{} builds on a foundation of innovation, quality and customer \
             service, and remains focused on meeting evolving market needs.",
            f.company, f.company
        ),
        format!(
            "**Additional Information:**\n{}",
            f.notes
                .unwrap_or("Further details are available through official company channels.")
        ),
        format!(
            "**Media Contact:**\n{}",
            f.contact
                .map(str::to_string)
                .unwrap_or_else(|| format!("Press inquiries: {}", f.press_email("press")))
        ),
        "###".to_string(),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlets::OutletRegistry;

    fn brief(body: &str) -> PressReleaseRequest {
        PressReleaseRequest {
            title: "Acme Rocket Skates".into(),
            body: body.into(),
            company_name: "Acme Corp".into(),
            target_outlets: vec![],
            category: "Product Launch".into(),
            contact_info: None,
            additional_notes: None,
        }
    }

    #[test]
    fn every_outlet_includes_title_and_company() {
        let registry = OutletRegistry::builtin();
        let brief = brief("We launch rocket skates.");
        for style in registry.iter() {
            let text = render(&brief, style);
            assert!(!text.is_empty(), "{} rendered empty", style.name);
            assert!(text.contains("Acme Rocket Skates"), "{} lost the title", style.name);
            assert!(text.contains("Acme Corp"), "{} lost the company", style.name);
        }
    }

    #[test]
    fn keywords_pick_the_connector_phrase() {
        let registry = OutletRegistry::builtin();
        let tc = registry.resolve("TechCrunch");

        assert!(render(&brief("Our product launch is here"), tc).contains("unveiled acme rocket skates"));
        assert!(render(&brief("Series A funding round"), tc).contains("raised fresh capital"));
        assert!(render(&brief("A new partnership with Roadrunner Inc"), tc).contains("strategic partnership"));
        assert!(render(&brief("Quarterly update"), tc).contains("announced acme rocket skates"));
    }

    #[test]
    fn blank_fields_get_defaults() {
        let empty = PressReleaseRequest::default();
        let text = render(&empty, OutletRegistry::builtin().resolve("General"));
        assert!(text.contains("Press Release from Company"));
        assert!(text.contains("Company Announces Company Milestone"));
        assert!(text.contains("press@company.com"));
    }

    #[test]
    fn press_email_keeps_only_ascii_alphanumerics() {
        let mut b = brief("launch");
        b.company_name = "Acme, Inc.".into();
        assert!(render(&b, OutletRegistry::builtin().resolve("General")).contains("press@acmeinc.com"));

        b.company_name = "Ünïcødé & Co!".into();
        assert_eq!(Fields::from_brief(&b).press_email("press"), "press@ncdco.com");

        b.company_name = "Ωμέγα".into();
        assert_eq!(Fields::from_brief(&b).press_email("press"), "press@company.com");
    }

    #[test]
    fn contact_and_notes_override_boilerplate() {
        let mut b = brief("launch");
        b.contact_info = Some("Wile E. Coyote, wile@acme.test".into());
        b.additional_notes = Some("Demo at CES".into());
        let text = render(&b, OutletRegistry::builtin().resolve("Forbes"));
        assert!(text.contains("**Investor Relations:** Wile E. Coyote, wile@acme.test"));
        assert!(text.contains("Demo at CES"));
        assert!(!text.contains("investor.relations@"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let registry = OutletRegistry::builtin();
        let b = brief("launch");
        assert_eq!(render(&b, registry.resolve("The Verge")), render(&b, registry.resolve("The Verge")));
    }
}
