//! Turns extracted records into Script Filter items.
//!
//! Apart from the title cache write in [`search_items`], these are pure
//! mappings with no I/O.

use crate::alfred::{Icon, Item, ModKey, Modifier};
use crate::models::{ArtifactRecord, SearchRecord, VersionSnippet};
use crate::utils::TitleCache;

/// Icon for the "NOT FOUND" item
const NOT_FOUND_ICON: &str = "icons/404.png";

/// Icon named after the first letter of the artifact id, e.g. `icons/K.png`
pub fn artifact_icon(artifact_id: &str) -> Option<Icon> {
    let first = artifact_id.chars().next().filter(|c| c.is_ascii_alphanumeric())?;
    Some(Icon::path(format!("icons/{}.png", first.to_ascii_uppercase())))
}

fn with_icon(item: Item, icon: Option<Icon>) -> Item {
    match icon {
        Some(icon) => item.icon(icon),
        None => item,
    }
}

/// Warning shown when a search matched nothing
pub fn not_found_item() -> Item {
    Item::new("NOT FOUND")
        .subtitle("Please check your keyword")
        .icon(Icon::path(NOT_FOUND_ICON))
}

/// One item per search hit, or a single "NOT FOUND" item.
///
/// Actioning an item continues with `"{group} {artifact}"`, which lists its
/// versions. ⌘ opens the artifact page. Each title is cached under the same key.
pub fn search_items(records: &[SearchRecord], titles: &TitleCache) -> Vec<Item> {
    if records.is_empty() {
        return vec![not_found_item()];
    }

    records
        .iter()
        .map(|record| {
            let query = record.coordinate().query();
            titles.store_json(&query, &record.title);

            let item = Item::new(&record.title)
                .subtitle(format!("{} >> {}", record.group_id, record.artifact_id))
                .arg(&query)
                .autocomplete(&query)
                .valid(true)
                .modifier(
                    ModKey::Cmd,
                    Modifier::new()
                        .arg(&record.url)
                        .subtitle(&record.description)
                        .valid(true),
                );

            with_icon(item, artifact_icon(&record.artifact_id))
        })
        .collect()
}

/// One item per version.
///
/// The item itself autocompletes to `"{group} {artifact} {version}"`; ⌘ opens
/// the version page, ⌃ copies a Maven dependency and ⇧ a Gradle line.
pub fn artifact_items(records: &[ArtifactRecord], titles: &TitleCache) -> Vec<Item> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    // All records share group and artifact; the title came from an earlier search.
    let key = first.coordinate().without_version().query();
    let cached_title: Option<String> = titles.load_json(&key);
    let open_subtitle = match &cached_title {
        Some(title) if !title.is_empty() => format!("Open {} in browser", title),
        _ => "Open in browser".to_string(),
    };

    records
        .iter()
        .map(|record| {
            let query = record.coordinate().query();

            let item = Item::new(&record.version)
                .subtitle(format!("{} {}", record.group_id, record.artifact_id))
                .arg(&query)
                .autocomplete(&query)
                .valid(false)
                .modifier(
                    ModKey::Cmd,
                    Modifier::new()
                        .arg(&record.url)
                        .subtitle(&open_subtitle)
                        .valid(true),
                )
                .modifier(
                    ModKey::Ctrl,
                    Modifier::new()
                        .arg(build_maven_arg(record))
                        .subtitle("Copy as maven format, scope may wrong")
                        .valid(true),
                )
                .modifier(
                    ModKey::Shift,
                    Modifier::new()
                        .arg(build_gradle_arg(record))
                        .subtitle("Copy as gradle format, configurations may wrong")
                        .valid(true),
                );

            with_icon(item, artifact_icon(&record.artifact_id))
        })
        .collect()
}

/// Exactly four items: Maven, Gradle, SBT and Ivy, each copying its snippet
pub fn snippet_items(snippet: &VersionSnippet) -> Vec<Item> {
    snippet
        .entries()
        .into_iter()
        .map(|(tool, text)| {
            Item::new(tool.name())
                .subtitle(format!("Copy as {} format", tool.name()))
                .arg(text)
                .valid(true)
                .copy_text(text)
        })
        .collect()
}

/// Maven `<dependency>` block for a version
pub fn build_maven_arg(record: &ArtifactRecord) -> String {
    format!(
        "<dependency>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n</dependency>",
        record.group_id, record.artifact_id, record.version
    )
}

/// Gradle `compile` line for a version
pub fn build_gradle_arg(record: &ArtifactRecord) -> String {
    format!(
        "compile group: '{}', name: '{}', version: '{}'",
        record.group_id, record.artifact_id, record.version
    )
}
