use crate::error::{GeoMapError, Result, ResultWithContext};
use crate::map_type::{lookup, MapType, MapTypeDescriptor};
use crate::spec::form_data::ChartFormData;
use crate::spec::query::QuerySpec;

/// Validate `spec` against a map type and append the raw columns that type needs.
///
/// All required fields are checked before anything is appended, so on error the
/// columns are left as they were. Columns already present are skipped, which makes
/// the operation idempotent. The metric is never appended: it is fetched through the
/// metric aggregation rather than as a raw column.
pub fn augment_query(spec: &mut QuerySpec, map_type: MapType) -> Result<()> {
    map_type.descriptor().augment_query(spec)
}

/// Build the query for a chart from its form data
pub fn build_query(form_data: &ChartFormData) -> Result<QuerySpec> {
    let descriptor = lookup(&form_data.leaflet_type).ok_or_else(|| {
        GeoMapError::unknown_variant(format!("Unknown map type: {}", form_data.leaflet_type))
    })?;

    if form_data.row_limit == 0 {
        return Err(GeoMapError::configuration("Row limit must be greater than zero"));
    }

    let mut spec = QuerySpec::from_form_data(form_data);
    descriptor
        .augment_query(&mut spec)
        .with_context(|| format!("Failed to build query for {}", descriptor.label))?;

    if let Some(metric) = spec.metric.as_ref().filter(|m| m.is_set()) {
        spec.metrics = vec![metric.clone()];
    }

    log::debug!(
        "Built {} query with columns {:?} and row limit {}",
        descriptor.key,
        spec.columns,
        spec.row_limit
    );
    Ok(spec)
}

/// Rule for map types that plot one point per row
pub(super) fn augment_point_query(
    spec: &mut QuerySpec,
    descriptor: &MapTypeDescriptor,
) -> Result<()> {
    check_required_fields(spec, descriptor)?;

    let mut columns: Vec<String> = Vec::new();
    if descriptor.capabilities.needs_lat_long {
        columns.extend(spec.latitude().map(String::from));
        columns.extend(spec.longitude().map(String::from));
    }
    if descriptor.capabilities.needs_label_field {
        columns.extend(spec.label_columns.iter().cloned());
    }
    spec.add_columns(columns.iter().map(String::as_str));
    Ok(())
}

/// Rule for map types that color regions of the boundary document
pub(super) fn augment_region_query(
    spec: &mut QuerySpec,
    descriptor: &MapTypeDescriptor,
) -> Result<()> {
    check_required_fields(spec, descriptor)?;

    let region = spec.region().map(String::from);
    spec.add_columns(region.as_deref());
    Ok(())
}

fn check_required_fields(spec: &QuerySpec, descriptor: &MapTypeDescriptor) -> Result<()> {
    let caps = &descriptor.capabilities;
    let missing = |field: &str| GeoMapError::missing_field(field, descriptor.label);

    if caps.needs_lat_long {
        if spec.latitude().is_none() {
            return Err(missing("latitude"));
        }
        if spec.longitude().is_none() {
            return Err(missing("longitude"));
        }
    }

    if caps.needs_region {
        if spec.geo_bounds_url().is_none() {
            return Err(missing("geo_bounds_url"));
        }
        if spec.geo_label_field().is_none() {
            return Err(missing("geo_label_field"));
        }
    }

    if caps.needs_metric && spec.metric_label().is_none() {
        return Err(missing("metric"));
    }

    if caps.needs_region && spec.region().is_none() {
        return Err(missing("region"));
    }

    Ok(())
}
