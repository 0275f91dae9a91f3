//! Site command - print the site identity constants

use color_eyre::eyre::Result;
use folio_core::{SITE, SiteMetadata};

/// Run the site command.
///
/// Prints plain text by default and JSON with `--json`.
pub fn run(json: bool) -> Result<()> {
    print!("{}", render(json)?);
    Ok(())
}

fn render(json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&SITE)?))
    } else {
        Ok(format_site(&SITE))
    }
}

fn format_site(site: &SiteMetadata) -> String {
    let mut out = format!(
        "{}\n{}\n\nAuthor: {} ({}, {})\n{}\n\n",
        site.title,
        site.description,
        site.author.name,
        site.author.company,
        site.author.company_url,
        site.author.bio,
    );
    for (platform, uri) in site.social.iter() {
        out.push_str(&format!("{platform}: {uri}\n"));
    }
    out
}
