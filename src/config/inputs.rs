use crate::domain::model::{DeviceAddress, ParameterChange};
use crate::utils::error::{BatchError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How address-file lines are screened before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFilter {
    /// Keep only bare IPv4/IPv6 addresses; other lines are dropped with a warning.
    #[default]
    ValidIpOnly,
    /// Keep every non-blank line, e.g. `host:port` targets.
    AcceptAll,
}

pub fn read_addresses<P: AsRef<Path>>(path: P, filter: AddressFilter) -> Result<Vec<DeviceAddress>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| BatchError::InputError {
        path: path.display().to_string(),
        source,
    })?;

    let addresses = parse_addresses(&content, filter);
    tracing::info!("📁 Loaded {} device address(es) from {}", addresses.len(), path.display());
    Ok(addresses)
}

pub fn parse_addresses(content: &str, filter: AddressFilter) -> Vec<DeviceAddress> {
    let mut addresses = Vec::new();

    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match filter {
            AddressFilter::AcceptAll => addresses.push(DeviceAddress::new(line)),
            AddressFilter::ValidIpOnly => match DeviceAddress::parse_ip(line) {
                Some(addr) => addresses.push(addr),
                None => tracing::warn!("Skipping line {}: '{}' is not an IP address", n + 1, line),
            },
        }
    }

    addresses
}

pub fn read_changes<P: AsRef<Path>>(path: P) -> Result<Vec<ParameterChange>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BatchError::InputError {
        path: path.display().to_string(),
        source,
    })?;

    let changes = parse_changes(file)?;
    tracing::info!("📁 Loaded {} parameter change(s) from {}", changes.len(), path.display());
    Ok(changes)
}

/// Reads `path,value` lines. Only the first comma separates; the value
/// keeps any further commas.
pub fn parse_changes<R: Read>(reader: R) -> Result<Vec<ParameterChange>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut changes = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut fields = record.iter();
        let path = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();
        if rest.is_empty() {
            tracing::warn!("Skipping line {}: expected 'path,value'", line);
            continue;
        }

        changes.push(ParameterChange::new(path, rest.join(",")));
    }

    Ok(changes)
}
