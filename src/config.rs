use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::ClasspathError;

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";
pub const CONVENTIONAL_JRE_DIR: &str = "./jre";
pub const DEFAULT_USER_CLASSPATH: &str = ".";

/// Where the bootstrap runtime may live, in the order it is tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JreLocator {
    pub jre_option: Option<PathBuf>,
    pub conventional_dir: PathBuf,
    pub java_home: Option<PathBuf>,
}

impl JreLocator {
    pub fn from_env(jre_option: Option<PathBuf>) -> Self {
        let java_home = env::var_os(JAVA_HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            jre_option,
            conventional_dir: PathBuf::from(CONVENTIONAL_JRE_DIR),
            java_home,
        }
    }

    /// The `-Xjre` override if it exists, else `./jre` if it exists, else
    /// `$JAVA_HOME/jre`.
    pub fn jre_dir(&self) -> Result<PathBuf, ClasspathError> {
        if let Some(dir) = self.jre_option.as_deref()
            && !dir.as_os_str().is_empty()
            && dir.exists()
        {
            return Ok(dir.to_path_buf());
        }
        if self.conventional_dir.exists() {
            return Ok(self.conventional_dir.clone());
        }
        if let Some(home) = self.java_home.as_deref() {
            return Ok(home.join("jre"));
        }
        Err(ClasspathError::RuntimeNotFound {
            tried: self.candidates(),
        })
    }

    fn candidates(&self) -> Vec<PathBuf> {
        self.jre_option
            .iter()
            .cloned()
            .chain(std::iter::once(self.conventional_dir.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub jre: JreLocator,
    pub user_classpath: String,
}

impl LoaderConfig {
    pub fn new(jre: JreLocator, user_classpath: Option<&str>) -> Self {
        let user_classpath = user_classpath
            .filter(|cp| !cp.is_empty())
            .unwrap_or(DEFAULT_USER_CLASSPATH)
            .to_string();
        Self {
            jre,
            user_classpath,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(
            JreLocator::from_env(cli.xjre.clone()),
            cli.classpath.as_deref(),
        )
    }
}

/// `<jre>/lib`, the directory whose archives form the bootstrap classpath.
pub fn bootstrap_lib_dir(jre_dir: &Path) -> PathBuf {
    jre_dir.join("lib")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(
        option: Option<PathBuf>,
        conventional: PathBuf,
        home: Option<PathBuf>,
    ) -> JreLocator {
        JreLocator {
            jre_option: option,
            conventional_dir: conventional,
            java_home: home,
        }
    }

    #[test]
    fn explicit_option_wins_when_it_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("explicit");
        let conventional = tmp.path().join("jre");
        std::fs::create_dir_all(&explicit).unwrap();
        std::fs::create_dir_all(&conventional).unwrap();

        let jre = locator(Some(explicit.clone()), conventional, None);
        assert_eq!(jre.jre_dir().unwrap(), explicit);
    }

    #[test]
    fn missing_option_falls_back_to_conventional_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let conventional = tmp.path().join("jre");
        std::fs::create_dir_all(&conventional).unwrap();

        let jre = locator(
            Some(tmp.path().join("nope")),
            conventional.clone(),
            Some(tmp.path().join("home")),
        );
        assert_eq!(jre.jre_dir().unwrap(), conventional);
    }

    #[test]
    fn java_home_is_the_last_resort() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let jre = locator(None, tmp.path().join("jre"), Some(home.clone()));
        assert_eq!(jre.jre_dir().unwrap(), home.join("jre"));
    }

    #[test]
    fn nothing_found_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let jre = locator(Some(tmp.path().join("x")), tmp.path().join("jre"), None);
        let err = jre.jre_dir().unwrap_err();
        assert!(matches!(err, ClasspathError::RuntimeNotFound { ref tried } if tried.len() == 2));
    }

    #[test]
    fn empty_user_classpath_defaults_to_current_dir() {
        let jre = locator(None, PathBuf::from("jre"), None);
        assert_eq!(LoaderConfig::new(jre.clone(), None).user_classpath, ".");
        assert_eq!(LoaderConfig::new(jre.clone(), Some("")).user_classpath, ".");
        assert_eq!(LoaderConfig::new(jre, Some("a.jar")).user_classpath, "a.jar");
    }
}
