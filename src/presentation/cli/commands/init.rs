use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::common::result::ResultExt;
use crate::domain::value_objects::branch_name::DEFAULT_BRANCH;
use crate::domain::value_objects::{BranchName, RemoteUrl};
use crate::infrastructure::filesystem::{ConfigStore, CONFIG_FILE_NAME};

const PLACEHOLDER_REMOTE: &str = "https://github.com/OWNER/REPOSITORY.git";

/// Write a gitdeploy.yaml template
pub struct InitCommand {
    /// Directory where to create gitdeploy.yaml
    pub path: Option<PathBuf>,
    /// Remote URL to fill in
    pub remote: Option<String>,
    /// Branch to fill in
    pub branch: Option<String>,
    /// Force overwrite existing file
    pub force: bool,
}

impl InitCommand {
    pub fn new(
        path: Option<PathBuf>,
        remote: Option<String>,
        branch: Option<String>,
        force: bool,
    ) -> Self {
        Self {
            path,
            remote,
            branch,
            force,
        }
    }

    /// Execute the init command
    pub async fn execute(&self) -> Result<()> {
        // Reject values every later deploy would refuse
        let remote = RemoteUrl::new(self.remote.as_deref().unwrap_or(PLACEHOLDER_REMOTE))?;
        let branch = BranchName::new(self.branch.as_deref().unwrap_or(DEFAULT_BRANCH))?;

        let target_dir = match &self.path {
            Some(path) => path.clone(),
            None => env::current_dir()
                .with_filesystem_error("Cannot determine current directory", None)?,
        };
        let target_file = target_dir.join(CONFIG_FILE_NAME);

        ConfigStore::new()
            .write_template(&target_file, remote.as_str(), branch.as_str(), self.force)
            .await?;

        println!("✅ Successfully created {} template file", CONFIG_FILE_NAME);
        println!("📁 Location: {}", target_file.display());
        println!();
        println!("📝 Next steps:");
        if self.remote.is_none() {
            println!("   1. Set remote_url in {}", CONFIG_FILE_NAME);
        } else {
            println!("   1. Review the settings in {}", CONFIG_FILE_NAME);
        }
        println!("   2. Run 'gitdeploy status' to see what would be published");
        println!("   3. Run 'gitdeploy deploy' to commit and push");

        Ok(())
    }
}
