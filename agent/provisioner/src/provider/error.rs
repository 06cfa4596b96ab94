use std::fmt::{Display, Formatter};

/// When a [`Create`](crate::Create) or [`Destroy`](crate::Destroy) implementation returns an
/// error, it states what it knows about the infrastructure that may have been left behind. The
/// classification is reported alongside the error; cleanup is attempted regardless.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resources {
    /// The operation failed before anything was provisioned, e.g. the definitions could not be
    /// found or `init` failed.
    Clear,

    /// The operation failed and infrastructure is known to still exist, e.g. `destroy` exited with
    /// an error.
    Remaining,

    /// The operation failed part way through and it is unknown what exists, e.g. `apply` exited
    /// with an error after creating some resources.
    Unknown,
}

impl Resources {
    pub fn message(&self) -> &'static str {
        match self {
            Resources::Clear => "Provisioning failed and no infrastructure was left behind",
            Resources::Remaining => "Provisioning failed and infrastructure was left behind",
            Resources::Unknown => {
                "Provisioning failed and it is unknown whether infrastructure was left behind"
            }
        }
    }

    /// Whether infrastructure may still exist after the error.
    pub fn may_remain(&self) -> bool {
        !matches!(self, Resources::Clear)
    }
}

impl Display for Resources {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

/// The error type returned by [`Create`](crate::Create) and [`Destroy`](crate::Destroy)
/// implementations. It is the single "provisioning operation failed" error that a test sees and it
/// carries the provisioning tool's message.
#[derive(Debug)]
pub struct ProviderError {
    resources: Resources,

    /// A description of what failed. This is displayed before `inner`.
    context: Option<String>,

    /// The error that caused this error.
    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

/// The result type returned by [`Create`](crate::Create) and [`Destroy`](crate::Destroy).
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    pub fn new_with_source_and_context<S, E>(resources: Resources, context: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            resources,
            context: Some(context.into()),
            inner: Some(source.into()),
        }
    }

    pub fn new_with_source<E>(resources: Resources, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            resources,
            context: None,
            inner: Some(source.into()),
        }
    }

    pub fn new_with_context<S>(resources: Resources, context: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            resources,
            context: Some(context.into()),
            inner: None,
        }
    }

    pub fn resources(&self) -> Resources {
        self.resources
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.as_deref()
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.context() {
            Some(context) => write!(f, "{}", context)?,
            None => write!(f, "{}", self.resources)?,
        }
        if let Some(inner) = self.inner() {
            write!(f, ": {}", inner)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Converts other error types into a `ProviderError` with a familiar `context` function.
pub trait IntoProviderError<T> {
    fn context<S>(self, resources: Resources, message: S) -> ProviderResult<T>
    where
        S: Into<String>;
}

impl<T, E> IntoProviderError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S>(self, resources: Resources, message: S) -> ProviderResult<T>
    where
        S: Into<String>,
    {
        self.map_err(|e| ProviderError::new_with_source_and_context(resources, message, e))
    }
}

// `None` becomes an error.
impl<T> IntoProviderError<T> for std::option::Option<T> {
    fn context<S>(self, resources: Resources, message: S) -> ProviderResult<T>
    where
        S: Into<String>,
    {
        self.ok_or_else(|| ProviderError::new_with_context(resources, message))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_includes_context_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "terraform: not found");
        let e: ProviderResult<()> = Err(io).context(Resources::Clear, "Unable to run init");
        let e = e.unwrap_err();
        assert_eq!(e.to_string(), "Unable to run init: terraform: not found");
        assert_eq!(e.resources(), Resources::Clear);
        assert!(e.source().is_some());
    }

    #[test]
    fn display_falls_back_to_resources() {
        let e = ProviderError::new_with_source(Resources::Unknown, "exit status 1");
        assert_eq!(
            e.to_string(),
            format!("{}: exit status 1", Resources::Unknown.message())
        );
        assert!(Resources::Unknown.may_remain());
        assert!(!Resources::Clear.may_remain());
    }

    #[test]
    fn none_becomes_error() {
        let missing: Option<u8> = None;
        let e = missing
            .context(Resources::Remaining, "Output 'cluster_id' missing")
            .unwrap_err();
        assert_eq!(e.to_string(), "Output 'cluster_id' missing");
        assert!(e.inner().is_none());
    }
}
