use crate::ast::BlockKind;
use crate::ids::IdError;
use crate::validate::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] merrow_core::Error),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("`{}` block is never closed", .0.keyword())]
    UnclosedBlock(BlockKind),

    #[error("`end` without an open block")]
    NoOpenBlock,

    #[error("`{}` blocks take no further branches", .0.keyword())]
    NoBranches(BlockKind),
}
