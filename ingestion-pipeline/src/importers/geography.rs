//! Biblical geography importer: place records with coordinates,
//! identification confidence, and verse references.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use common::document::CorpusDocument;
use common::error::AppError;

/// Upstream JSONL feed of ancient place records.
pub const GEOGRAPHY_DATA_URL: &str =
    "https://raw.githubusercontent.com/openbibleinfo/Bible-Geocoding-Data/main/data/ancient.jsonl";

/// Cap on verse references carried in metadata.
const MAX_VERSE_REFS: usize = 20;

pub struct GeographyImporter {
    data_dir: PathBuf,
    jsonl_file: PathBuf,
}

impl GeographyImporter {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            jsonl_file: data_dir.join("ancient.jsonl"),
        }
    }

    pub fn jsonl_file(&self) -> &Path {
        &self.jsonl_file
    }

    /// Downloads the place feed unless a cached copy exists.
    pub async fn download_data(&self, force: bool) -> Result<PathBuf, AppError> {
        self.download_from(GEOGRAPHY_DATA_URL, force).await
    }

    pub async fn download_from(&self, url: &str, force: bool) -> Result<PathBuf, AppError> {
        if self.jsonl_file.exists() && !force {
            info!(path = %self.jsonl_file.display(), "using cached geography data");
            return Ok(self.jsonl_file.clone());
        }

        tokio::fs::create_dir_all(&self.data_dir).await?;

        info!(url, "downloading geography data");
        let body = reqwest::get(url).await?.error_for_status()?.text().await?;
        tokio::fs::write(&self.jsonl_file, &body).await?;
        info!(
            bytes = body.len(),
            path = %self.jsonl_file.display(),
            "downloaded geography data"
        );

        Ok(self.jsonl_file.clone())
    }

    /// Parses the JSONL file; invalid lines are skipped with a warning.
    pub fn parse_jsonl(&self) -> Result<Vec<Value>, AppError> {
        if !self.jsonl_file.exists() {
            return Err(AppError::SourceData(format!(
                "Geography data file not found: {}. Run with download enabled \
                 or check the data directory.",
                self.jsonl_file.display()
            )));
        }

        let content = std::fs::read_to_string(&self.jsonl_file)?;
        let mut places = Vec::new();
        let mut skipped = 0usize;

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(entry) => places.push(entry),
                Err(err) => {
                    warn!(line = line_num + 1, error = %err, "skipping invalid JSON line");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped invalid lines");
        }
        info!(count = places.len(), "parsed place entries");
        Ok(places)
    }

    /// Converts every entry, skipping (and counting) conversion failures.
    pub fn load_documents(&self) -> Result<Vec<CorpusDocument>, AppError> {
        let entries = self.parse_jsonl()?;
        let mut documents = Vec::with_capacity(entries.len());
        let mut skipped = 0usize;

        for entry in &entries {
            match place_to_document(entry) {
                Ok(document) => documents.push(document),
                Err(err) => {
                    let name = entry
                        .get("friendly_id")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown");
                    warn!(place = name, error = %err, "failed to convert place entry");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped unconvertible place entries");
        }
        Ok(documents)
    }
}

/// Weighted vote sum used when the upstream `vote_total` is absent:
/// yes +30, likely +10, possible +5, unlikely -10, no -20.
pub fn calculate_confidence_score(entry: &Value) -> i64 {
    let votes = |key: &str| entry.get(key).and_then(Value::as_i64).unwrap_or(0);
    votes("confidence_yes") * 30
        + votes("confidence_likely") * 10
        + votes("confidence_possible") * 5
        + votes("confidence_unlikely") * -10
        + votes("confidence_no") * -20
}

/// Buckets a numeric confidence score into a categorical level.
pub fn classify_confidence(score: i64) -> &'static str {
    if score > 500 {
        "very high"
    } else if score > 200 {
        "high"
    } else if score > 50 {
        "moderate"
    } else {
        "low"
    }
}

/// Parses a `"lon,lat"` string into `(latitude, longitude)`, rejecting
/// out-of-range values.
pub fn parse_coordinates(lonlat: Option<&str>) -> Option<(f64, f64)> {
    let lonlat = lonlat?;
    let (lon_part, lat_part) = lonlat.split_once(',')?;

    let lon: f64 = lon_part.trim().parse().ok()?;
    let lat: f64 = lat_part.trim().parse().ok()?;

    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        warn!(lon, lat, "invalid coordinates");
        return None;
    }

    Some((lat, lon))
}

/// Pulls human-readable verse references, deduplicated, sorted, and
/// truncated to [`MAX_VERSE_REFS`].
pub fn extract_verse_references(entry: &Value) -> Vec<String> {
    let mut refs: BTreeSet<String> = BTreeSet::new();

    if let Some(verses) = entry.get("verses").and_then(Value::as_array) {
        for verse in verses {
            if let Some(readable) = verse.get("readable").and_then(Value::as_str) {
                refs.insert(readable.to_string());
            }
        }
    }

    let total = refs.len();
    let refs: Vec<String> = refs.into_iter().take(MAX_VERSE_REFS).collect();
    if total > MAX_VERSE_REFS {
        debug!(
            place = entry
                .get("friendly_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Unknown"),
            total,
            kept = MAX_VERSE_REFS,
            "truncating verse references"
        );
    }
    refs
}

/// First resolution of the first identification, the primary data source
/// in the OpenBible format.
fn best_identification(entry: &Value) -> Option<&Value> {
    entry
        .get("identifications")?
        .as_array()?
        .first()?
        .get("resolutions")?
        .as_array()?
        .first()
}

/// Converts one place entry to the uniform document shape.
pub fn place_to_document(entry: &Value) -> Result<CorpusDocument, AppError> {
    let friendly_id = entry.get("friendly_id").and_then(Value::as_str);
    let slug = entry
        .get("url_slug")
        .and_then(Value::as_str)
        .or(friendly_id)
        .unwrap_or("unknown");
    let place_name = friendly_id.unwrap_or(slug);

    let mut place_type = entry
        .get("types")
        .and_then(Value::as_array)
        .and_then(|types| types.first())
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let resolution = best_identification(entry);
    let land_or_water = resolution
        .and_then(|r| r.get("land_or_water"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let lonlat = resolution
        .and_then(|r| r.get("lonlat"))
        .and_then(Value::as_str);
    if let Some(resolution_type) = resolution
        .and_then(|r| r.get("type"))
        .and_then(Value::as_str)
    {
        if !resolution_type.is_empty() {
            place_type = resolution_type;
        }
    }

    let coordinates = parse_coordinates(lonlat);

    let confidence_score = entry
        .get("identifications")
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(|id| id.get("score"))
        .and_then(|score| score.get("vote_total"))
        .and_then(Value::as_i64)
        .unwrap_or_else(|| calculate_confidence_score(entry));
    let confidence_level = classify_confidence(confidence_score);

    let verse_refs = extract_verse_references(entry);
    let verse_count = verse_refs.len();

    let alternate_names: Vec<String> = entry
        .get("translation_name_counts")
        .and_then(Value::as_object)
        .map(|counts| counts.keys().cloned().collect())
        .unwrap_or_default();

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("**{place_name}** is a biblical {place_type}."));

    match coordinates {
        Some((lat, lon)) => parts.push(format!(
            "Located at {lat:.4}°N, {lon:.4}°E ({land_or_water})."
        )),
        None => parts.push(format!(
            "Location type: {land_or_water}. Coordinates unknown."
        )),
    }

    parts.push(format!(
        "Identification confidence: {confidence_level} (score: {confidence_score})."
    ));

    if !verse_refs.is_empty() {
        let mut sample = verse_refs.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        if verse_refs.len() > 5 {
            sample.push_str(&format!(", ... ({verse_count} total references)"));
        }
        parts.push(format!("Biblical references: {sample}"));
    }

    let other_names: Vec<&String> = alternate_names
        .iter()
        .filter(|name| name.as_str() != place_name)
        .take(5)
        .collect();
    if !other_names.is_empty() {
        let names = other_names
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Also known as: {names}"));
    }

    let mut metadata = serde_json::Map::new();
    metadata.insert("slug".to_string(), json!(slug));
    metadata.insert("place_name".to_string(), json!(place_name));
    metadata.insert("place_type".to_string(), json!(place_type));
    metadata.insert("land_or_water".to_string(), json!(land_or_water));
    metadata.insert("confidence_score".to_string(), json!(confidence_score));
    metadata.insert("confidence_level".to_string(), json!(confidence_level));
    metadata.insert("verse_count".to_string(), json!(verse_count));
    if let Some((lat, lon)) = coordinates {
        metadata.insert("latitude".to_string(), json!(lat));
        metadata.insert("longitude".to_string(), json!(lon));
    }
    if !verse_refs.is_empty() {
        metadata.insert("verse_references".to_string(), json!(verse_refs));
    }
    if !alternate_names.is_empty() {
        metadata.insert("alternate_names".to_string(), json!(alternate_names));
    }

    Ok(CorpusDocument {
        title: format!("Biblical Place: {place_name}"),
        content: parts.join(" "),
        domain: "geography/biblical".to_string(),
        metadata: Value::Object(metadata),
    })
}
