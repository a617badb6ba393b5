//! # gitdeploy - Publish a working tree to a git remote
//!
//! `gitdeploy` turns a local directory into a git repository if needed, then
//! stages everything, commits when something changed and pushes the commit to
//! a configured remote branch. It drives the `git` executable instead of
//! linking a git library, so whatever credentials and hooks the user's git
//! already has keep working.
//!
//! ## Features
//!
//! - **One-step publishing**: init, branch, stage, commit and push in one call
//! - **Idempotent reruns**: a clean working tree produces no commit and no push
//! - **Typed inputs**: remote locators and branch names are validated up front
//! - **Layered configuration**: `gitdeploy.yaml`, environment and flags
//!
//! ## Quick Start
//!
//! ```bash
//! gitdeploy init --remote https://github.com/example/site.git --branch gh-pages
//! gitdeploy status
//! gitdeploy deploy -m "Publish docs"
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: Validated configuration and value objects
//! - [`application`]: The deploy workflow and the read-only status check
//! - [`infrastructure`]: Process execution, git invocations, config files
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: Shared utilities and error handling
//!
//! ## Domain Model
//!
//! - [`domain::entities::deployer_config::DeployerConfig`]: What to publish and where
//! - [`domain::value_objects::remote_url::RemoteUrl`]: Type-safe remote locator
//! - [`domain::value_objects::branch_name::BranchName`]: Type-safe branch name
//! - [`domain::value_objects::commit_message::CommitMessage`]: Commit message with timestamp default
//!
//! ## Error Handling
//!
//! - [`application::use_cases::DeployError`]: Which stage of a deploy failed and why
//! - [`common::error::GitDeployError`]: Crate-wide error type
//! - [`common::result::GitDeployResult`]: Type alias for `Result<T, GitDeployError>`
//!
//! ## Examples
//!
//! ### Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gitdeploy::application::use_cases::Deployer;
//! use gitdeploy::domain::entities::DeployerConfig;
//! use gitdeploy::infrastructure::ProcessCommandRunner;
//!
//! # async fn example() -> gitdeploy::Result<()> {
//! let config = DeployerConfig::new("./public", "git@github.com:example/site.git")?
//!     .with_branch("gh-pages")?;
//!
//! let deployer = Deployer::with_runner(config, Arc::new(ProcessCommandRunner::new()));
//! let report = deployer.deploy(Some("Publish docs")).await?;
//!
//! if report.pushed() {
//!     println!("Published");
//! }
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::GitDeployError;
pub use crate::common::result::GitDeployResult as Result;
