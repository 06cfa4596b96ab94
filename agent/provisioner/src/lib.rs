/*!

The `provisioner` library drives the lifecycle of infrastructure that is stood up for the duration
of a test. You describe how to provision and tear down your infrastructure by implementing the
[`Create`] and [`Destroy`] traits, then hand these to a [`Lifecycle`] which applies the
infrastructure and guarantees that it is destroyed afterwards, exactly once, on every exit path.

If you need finer control, a [`DestroyGuard`] can be held directly in a test function. It destroys
the infrastructure when it goes out of scope, including when the test panics.

!*/

mod configuration;
mod guard;
mod lifecycle;
pub mod provider;

pub use configuration::Configuration;
pub use guard::DestroyGuard;
pub use lifecycle::{Lifecycle, Outcome, Parallelism, Stage};
pub use provider::{Create, Destroy};
