use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// The `Configuration` trait is for the "plain old data" structs that carry custom information
/// between a test and its [`Create`](crate::Create) and [`Destroy`](crate::Destroy)
/// implementations: the settings needed to provision infrastructure and the description of what
/// was provisioned.
///
/// The aggregated traits let a test log, compare and persist these values without knowing their
/// concrete types.
pub trait Configuration:
    Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + Sized + 'static
{
}

impl Configuration for () {}
