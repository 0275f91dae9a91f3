//! Site identity constants read by page templates.

use serde::Serialize;

/// Site-wide identity values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    /// Site title.
    pub title: &'static str,

    /// Site description for meta tags.
    pub description: &'static str,

    /// Social profile links.
    pub social: SocialLinks,

    /// Site author.
    pub author: Author,
}

/// Links to social profiles, keyed by platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub github: &'static str,
    pub linkedin: &'static str,
    pub email: &'static str,
}

impl SocialLinks {
    /// Iterate `(platform, uri)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        [
            ("github", self.github),
            ("linkedin", self.linkedin),
            ("email", self.email),
        ]
        .into_iter()
    }
}

/// Author metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: &'static str,
    pub bio: &'static str,
    pub company: &'static str,
    pub company_url: &'static str,
}

/// The site's identity.
pub const SITE: SiteMetadata = SiteMetadata {
    title: "Wannes Gennar",
    description: "Full-stack .NET engineer exploring Rust, Elixir, and modern web technologies. \
                  Founder of Elixus, creator of Meshum.",
    social: SocialLinks {
        github: "https://github.com/dealloc",
        linkedin: "https://linkedin.com/in/wannesgennar",
        email: "mailto:hello@wannesgennar.com",
    },
    author: Author {
        name: "Wannes Gennar",
        bio: "Full-stack .NET engineer with a passion for building scalable systems. \
              Founder of Elixus, currently building Meshum\u{2014}a unified knowledge layer \
              for software teams.",
        company: "Elixus",
        company_url: "https://www.elixus.be",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_links_order() {
        let platforms: Vec<_> = SITE.social.iter().map(|(p, _)| p).collect();
        assert_eq!(platforms, vec!["github", "linkedin", "email"]);
    }

    #[test]
    fn test_links_are_absolute_urls() {
        for (platform, uri) in SITE.social.iter() {
            assert!(url::Url::parse(uri).is_ok(), "{platform} link is not a url");
        }
        assert!(url::Url::parse(SITE.author.company_url).is_ok());
    }

    #[test]
    fn test_author_serializes_camel_case() {
        let value = serde_yaml::to_value(SITE.author).expect("serialize");
        assert_eq!(
            value.get("companyUrl").and_then(|v| v.as_str()),
            Some("https://www.elixus.be")
        );
    }

    #[test]
    fn test_description_is_single_line() {
        assert!(!SITE.description.contains('\n'));
        assert!(SITE.description.contains("Founder of Elixus, creator of Meshum."));
    }
}
