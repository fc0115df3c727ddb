use std::result;
use thiserror::Error;

#[cfg(feature = "geojson")]
use geojson::Error as GeoJsonError;

pub type Result<T> = result::Result<T, GeoMapError>;

#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

/// How an error is surfaced to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field the selected map type needs is missing or invalid. Blocks the chart.
    Configuration,
    /// The selected map type is not in the catalog. Renders a placeholder.
    UnknownVariant,
    /// The boundary document could not be loaded. The chart renders without it.
    BoundaryFetch,
    Internal,
    External,
}

#[derive(Error, Debug)]
pub enum GeoMapError {
    #[error("Missing field error: {0} is required for {1}\n{2}")]
    MissingFieldError(String, String, ErrorContext),

    #[error("Configuration error: {0}\n{1}")]
    ConfigurationError(String, ErrorContext),

    #[error("Unknown map type error: {0}\n{1}")]
    UnknownVariantError(String, ErrorContext),

    #[error("Boundary fetch error: {0}\n{1}")]
    BoundaryFetchError(String, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),

    #[error("External error: {0}\n{1}")]
    ExternalError(String, ErrorContext),

    #[error("Format error: {0}\n{1}")]
    FormatError(std::fmt::Error, ErrorContext),

    #[error("IO Error: {0}\n{1}")]
    IOError(std::io::Error, ErrorContext),

    #[error("Serde JSON Error: {0}\n{1}")]
    SerdeJsonError(serde_json::Error, ErrorContext),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON Error: {0}\n{1}")]
    GeoJsonError(GeoJsonError, ErrorContext),
}

impl GeoMapError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use GeoMapError::*;
        match self {
            MissingFieldError(field, variant, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::MissingFieldError(field, variant, context)
            }
            ConfigurationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::ConfigurationError(msg, context)
            }
            UnknownVariantError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::UnknownVariantError(msg, context)
            }
            BoundaryFetchError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::BoundaryFetchError(msg, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::InternalError(msg, context)
            }
            ExternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::ExternalError(msg, context)
            }
            FormatError(err, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::FormatError(err, context)
            }
            IOError(err, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::IOError(err, context)
            }
            SerdeJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::SerdeJsonError(err, context)
            }
            #[cfg(feature = "geojson")]
            GeoJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                GeoMapError::GeoJsonError(err, context)
            }
        }
    }

    pub fn missing_field<S: Into<String>, V: Into<String>>(field: S, variant_label: V) -> Self {
        Self::MissingFieldError(field.into(), variant_label.into(), Default::default())
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::ConfigurationError(message.into(), Default::default())
    }

    pub fn unknown_variant<S: Into<String>>(message: S) -> Self {
        Self::UnknownVariantError(message.into(), Default::default())
    }

    pub fn boundary_fetch<S: Into<String>>(message: S) -> Self {
        Self::BoundaryFetchError(message.into(), Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }

    pub fn external<S: Into<String>>(message: S) -> Self {
        Self::ExternalError(message.into(), Default::default())
    }

    pub fn kind(&self) -> ErrorKind {
        use GeoMapError::*;
        match self {
            MissingFieldError(..) | ConfigurationError(..) => ErrorKind::Configuration,
            UnknownVariantError(..) => ErrorKind::UnknownVariant,
            BoundaryFetchError(..) => ErrorKind::BoundaryFetch,
            InternalError(..) | FormatError(..) => ErrorKind::Internal,
            ExternalError(..) | IOError(..) | SerdeJsonError(..) => ErrorKind::External,
            #[cfg(feature = "geojson")]
            GeoJsonError(..) => ErrorKind::BoundaryFetch,
        }
    }

    /// The headline of the error, without the context stack. This is the text shown
    /// to the viewer.
    pub fn message(&self) -> String {
        use GeoMapError::*;
        match self {
            MissingFieldError(field, variant, _) => format!("{field} is required for {variant}"),
            ConfigurationError(msg, _)
            | UnknownVariantError(msg, _)
            | BoundaryFetchError(msg, _)
            | InternalError(msg, _)
            | ExternalError(msg, _) => msg.clone(),
            FormatError(err, _) => err.to_string(),
            IOError(err, _) => err.to_string(),
            SerdeJsonError(err, _) => err.to_string(),
            #[cfg(feature = "geojson")]
            GeoJsonError(err, _) => err.to_string(),
        }
    }

    /// Duplicate error. Not a precise Clone because some of the wrapped error types aren't Clone
    /// These are converted to external errors
    pub fn duplicate(&self) -> Self {
        use GeoMapError::*;
        match self {
            MissingFieldError(field, variant, context) => {
                GeoMapError::MissingFieldError(field.clone(), variant.clone(), context.clone())
            }
            ConfigurationError(msg, context) => {
                GeoMapError::ConfigurationError(msg.clone(), context.clone())
            }
            UnknownVariantError(msg, context) => {
                GeoMapError::UnknownVariantError(msg.clone(), context.clone())
            }
            BoundaryFetchError(msg, context) => {
                GeoMapError::BoundaryFetchError(msg.clone(), context.clone())
            }
            InternalError(msg, context) => GeoMapError::InternalError(msg.clone(), context.clone()),
            ExternalError(msg, context) => GeoMapError::ExternalError(msg.clone(), context.clone()),
            FormatError(err, context) => GeoMapError::FormatError(*err, context.clone()),
            IOError(err, context) => GeoMapError::ExternalError(err.to_string(), context.clone()),
            SerdeJsonError(err, context) => {
                GeoMapError::ExternalError(err.to_string(), context.clone())
            }
            #[cfg(feature = "geojson")]
            GeoJsonError(err, context) => {
                GeoMapError::BoundaryFetchError(err.to_string(), context.clone())
            }
        }
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<GeoMapError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let geomap_error: GeoMapError = err.into();
                Err(geomap_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(GeoMapError::internal(context_fn().into())),
        }
    }
}

impl From<std::fmt::Error> for GeoMapError {
    fn from(err: std::fmt::Error) -> Self {
        Self::FormatError(err, Default::default())
    }
}

impl From<std::io::Error> for GeoMapError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err, Default::default())
    }
}

impl From<serde_json::Error> for GeoMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeJsonError(err, Default::default())
    }
}

#[cfg(feature = "geojson")]
impl From<GeoJsonError> for GeoMapError {
    fn from(err: GeoJsonError) -> Self {
        Self::GeoJsonError(err, Default::default())
    }
}

pub trait ToExternalError<T> {
    fn external<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: std::error::Error> ToExternalError<T> for std::result::Result<T, E> {
    fn external<S: Into<String>>(self, context: S) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(err) => {
                let context = ErrorContext {
                    contexts: vec![context.into()],
                };
                Err(GeoMapError::ExternalError(err.to_string(), context))
            }
        }
    }
}

pub trait DuplicateResult {
    fn duplicate(&self) -> Self;
}

impl<T> DuplicateResult for Result<T>
where
    T: Clone,
{
    fn duplicate(&self) -> Self {
        match self {
            Ok(v) => Ok(v.clone()),
            Err(err) => Err(err.duplicate()),
        }
    }
}
