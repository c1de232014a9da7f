mod reef;

pub use reef::Ref;

use crate::device::Device;

pub type DPtr<T, D> = <D as Device>::Ptr<T>;
