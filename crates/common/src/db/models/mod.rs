//! SeaORM entity models
//!
//! Database entities for Shikshak Sarthi

mod admin_comment;
mod appraisal;
mod publication;
mod user;

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
    FormPart,
    Role,
};

pub use appraisal::{
    Entity as AppraisalEntity,
    Model as Appraisal,
    ActiveModel as AppraisalActiveModel,
    Column as AppraisalColumn,
    AppraisalStatus,
};

pub use publication::{
    Entity as PublicationEntity,
    Model as Publication,
    ActiveModel as PublicationActiveModel,
    Column as PublicationColumn,
    PublicationSource,
};

pub use admin_comment::{
    Entity as AdminCommentEntity,
    Model as AdminComment,
    ActiveModel as AdminCommentActiveModel,
    Column as AdminCommentColumn,
    CommentType,
};
