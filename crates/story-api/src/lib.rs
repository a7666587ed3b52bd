//! Story API - data access layer for the story client
//!
//! ## Architecture
//!
//! - [`client`]: the [`StoryApi`] trait and its `reqwest` implementation
//! - [`models`]: wire types returned by the remote API
//! - [`auth`]: [`AuthModel`], session persistence over a [`KeyValueStore`]
//! - [`story`]: [`StoryModel`], list/detail/upload with offline fallback
//! - [`database`]: the local structured store used as an offline read cache
//! - [`notification`]: push subscription helpers
//!
//! Model operations never return transport errors to their callers: every
//! failure is folded into a [`ModelFailure`] carrying a short user-facing
//! message.

pub mod auth;
pub mod client;
pub mod database;
pub mod error;
pub mod models;
pub mod notification;
pub mod story;

pub use auth::{AuthModel, KeyValueStore, MemoryStore, Session};
pub use client::{HttpStoryApi, StoryApi};
pub use database::{MemoryStoryDatabase, StoryDatabase};
pub use error::{ApiError, ModelFailure, ModelResult, StorageError};
pub use models::{
	ApiMessage, ListQuery, LoginResponse, LoginResult, NewStory, Photo, PushKeys, PushSubscription,
	StoriesResponse, Story, StoryResponse, User,
};
pub use notification::{NotificationService, Permission, PushError, PushManager, decode_vapid_key};
pub use story::{StoryDraft, StoryModel};
