use crate::model::Album;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    Http(String),
    File(PathBuf),
}

impl LibrarySource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

// Listing endpoints answer with a bare array; an object wrapping it under
// `albums` is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Albums(Vec<Album>),
    Wrapped { albums: Vec<Album> },
}

pub fn parse_listing(raw: &str) -> Result<Vec<Album>> {
    let listing: Listing = serde_json::from_str(raw).context("album listing is not valid JSON")?;
    Ok(match listing {
        Listing::Albums(albums) | Listing::Wrapped { albums } => albums,
    })
}

pub fn load(source: &LibrarySource, timeout: Duration) -> Result<Vec<Album>> {
    let albums = match source {
        LibrarySource::Http(url) => fetch(url, timeout)?,
        LibrarySource::File(path) => read_file(path)?,
    };
    info!(source = %source.describe(), albums = albums.len(), "fetched album listing");
    Ok(albums)
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<Album>> {
    debug!(url, "requesting album listing");
    // Proxy settings from the environment do not apply to a server on this
    // machine.
    let proxy = if is_loopback(url) {
        None
    } else {
        ureq::Proxy::try_from_env()
    };
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .proxy(proxy)
        .build()
        .into();
    let mut response = agent
        .get(url)
        .call()
        .with_context(|| format!("failed to fetch album listing from {url}"))?;
    let body = response
        .body_mut()
        .read_to_string()
        .with_context(|| format!("failed to read album listing from {url}"))?;
    parse_listing(&body).with_context(|| format!("bad album listing from {url}"))
}

fn is_loopback(url: &str) -> bool {
    let authority = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest)
        .split('/')
        .next()
        .unwrap_or_default();
    let host = if authority.ends_with(']') {
        authority
    } else {
        authority.rsplit_once(':').map_or(authority, |(host, _)| host)
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

fn read_file(path: &Path) -> Result<Vec<Album>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read album listing {}", path.display()))?;
    parse_listing(&raw).with_context(|| format!("bad album listing in {}", path.display()))
}
