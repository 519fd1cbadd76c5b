use std::path::Path;
use tracing::{debug, info};

use crate::config::{LoaderConfig, bootstrap_lib_dir};
use crate::entry::{Entry, Located};
use crate::error::ClasspathError;

/// Bootstrap, extension and user roots, searched in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    boot: Entry,
    ext: Entry,
    user: Entry,
}

impl Classpath {
    pub fn new(boot: Entry, ext: Entry, user: Entry) -> Self {
        Self { boot, ext, user }
    }

    /// Builds all three roots. Fails only when no JRE directory can be found.
    pub fn parse(config: &LoaderConfig) -> Result<Self, ClasspathError> {
        let jre_dir = config.jre.jre_dir()?;
        info!(jre_dir = %jre_dir.display(), "using runtime directory");
        Ok(Self::from_jre_dir(&jre_dir, &config.user_classpath))
    }

    pub fn from_jre_dir(jre_dir: &Path, user_classpath: &str) -> Self {
        let boot = Entry::wildcard(bootstrap_lib_dir(jre_dir));
        let ext = Entry::Composite(Vec::new());
        let user = Entry::new(user_classpath);
        info!(user = %user, "user classpath");
        Self::new(boot, ext, user)
    }

    pub fn boot(&self) -> &Entry {
        &self.boot
    }

    pub fn ext(&self) -> &Entry {
        &self.ext
    }

    pub fn user(&self) -> &Entry {
        &self.user
    }

    /// Finds `class_name` (`java.lang.Object` or `java/lang/Object`) in the
    /// bootstrap, extension then user root.
    pub fn read_class(&self, class_name: &str) -> Result<Located<'_>, ClasspathError> {
        let class_file = class_name_to_class_path(class_name);
        for (root, entry) in [("boot", &self.boot), ("ext", &self.ext), ("user", &self.user)] {
            if let Some(found) = entry.read_class(&class_file) {
                debug!(class = class_name, root, from = %found.entry, "class located");
                return Ok(found);
            }
        }
        Err(ClasspathError::ClassNotFound {
            name: class_name.to_string(),
        })
    }
}

pub fn class_name_to_class_path(class_name: &str) -> String {
    format!("{}.class", class_name.replace('.', "/"))
}
