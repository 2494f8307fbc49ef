//! Option get/set/delete operations.

use crate::error::Error;
use crate::tmux::Tmux;
use crate::types::{OptionScope, TmuxOption};

impl Tmux {
    /// Set an option on the target at the given scope.
    pub async fn set_option(
        &self,
        target: &str,
        key: &str,
        value: &str,
        scope: OptionScope,
    ) -> Result<(), Error> {
        let mut query = self.query().cmd("set-option");
        if let Some(flag) = scope.flag() {
            query = query.fargs(&[flag]);
        }
        query = query.fargs(&["-t", target]).pargs(&[key, value]);
        self.run_query(query).await?;
        Ok(())
    }

    /// Retrieve a single option value from the target.
    pub async fn option(
        &self,
        target: &str,
        key: &str,
        scope: OptionScope,
    ) -> Result<TmuxOption, Error> {
        let mut query = self.query().cmd("show-option");
        if let Some(flag) = scope.flag() {
            query = query.fargs(&[flag]);
        }
        query = query.fargs(&["-t", target]).fargs(&["-v", key]);

        let output = self.run_query(query).await?;
        Ok(TmuxOption::new(key, output.raw().trim()))
    }

    /// List all options set on the target.
    pub async fn options(&self, target: &str, scope: OptionScope) -> Result<Vec<TmuxOption>, Error> {
        let mut query = self.query().cmd("show-options");
        if let Some(flag) = scope.flag() {
            query = query.fargs(&[flag]);
        }
        query = query.fargs(&["-t", target]);

        let output = self.run_query(query).await?;
        Ok(parse_options(&output.result().lines))
    }

    /// Unset an option on the target.
    pub async fn delete_option(
        &self,
        target: &str,
        key: &str,
        scope: OptionScope,
    ) -> Result<(), Error> {
        let mut query = self.query().cmd("set-option");
        if let Some(flag) = scope.flag() {
            query = query.fargs(&[flag]);
        }
        query = query.fargs(&["-t", target]).fargs(&["-u", key]);
        self.run_query(query).await?;
        Ok(())
    }
}

/// `show-options` prints one `key value` pair per line; lines without a
/// value are skipped.
fn parse_options(lines: &[String]) -> Vec<TmuxOption> {
    let mut options = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(' ') else {
            continue;
        };
        options.push(TmuxOption::new(key, value));
    }
    options
}
