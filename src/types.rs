use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;

macro_rules! impl_primitive_num {
    (pub struct $outer:ident($tname:ty)) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Serialize,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Deserialize,
            Shrinkwrap,
        )]
        #[serde(transparent)]
        pub struct $outer(pub $tname);

        impl std::fmt::Display for $outer {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$tname> for $outer {
            fn from(value: $tname) -> Self {
                Self(value)
            }
        }
    };
}

impl_primitive_num!(pub struct ChainId(u64));
impl_primitive_num!(pub struct BlockNumber(u64));
impl_primitive_num!(pub struct ConfirmationDepth(u64));

impl ConfirmationDepth {
    /// Shallowest depth a deployment is allowed to be recorded at.
    pub const MIN: Self = Self(2);
}

impl BlockNumber {
    /// Number of blocks mined on top of `self` when `head` is the latest block.
    pub fn depth_at(self, head: BlockNumber) -> ConfirmationDepth {
        ConfirmationDepth(head.0.saturating_sub(self.0))
    }
}
