use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::attribute::AttributeInfo;
use crate::classfile::{ClassFile, class_flag_names};
use crate::constant_pool::Constant;
use crate::entry::{Entry, Located};
use crate::error::ClasspathError;
use crate::member::MemberInfo;

#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub descriptor: String,
    pub access_flags: String,
    /// Bytecode length; `None` for fields and abstract or native methods.
    pub code_length: Option<usize>,
}

impl From<&MemberInfo> for MemberSummary {
    fn from(member: &MemberInfo) -> Self {
        let code_length = match member.code() {
            Some(AttributeInfo::Code { code, .. }) => Some(code.len()),
            _ => None,
        };
        Self {
            name: member.name.clone(),
            descriptor: member.descriptor.clone(),
            access_flags: format!("{:#06x}", member.access_flags),
            code_length,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub class_name: String,
    pub kind: &'static str,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub version: String,
    pub access_flags: String,
    pub flags: Vec<String>,
    pub constant_pool_count: usize,
    pub referenced_classes: Vec<String>,
    pub source_file: Option<String>,
    pub fields: Vec<MemberSummary>,
    pub methods: Vec<MemberSummary>,
    pub attributes: Vec<String>,
    pub source: Option<String>,
    pub size: usize,
    pub content_hash: String,
}

impl ClassReport {
    pub fn new(class: &ClassFile, data: &[u8], source: Option<&Entry>) -> Self {
        Self {
            class_name: class.class_name().to_string(),
            kind: if class.is_interface() { "interface" } else { "class" },
            super_class: class.super_class_name().map(str::to_string),
            interfaces: class.interface_names().into_iter().map(str::to_string).collect(),
            version: format!("{}.{}", class.major_version, class.minor_version),
            access_flags: format!("{:#06x}", class.access_flags),
            flags: class_flag_names(class.access_flags)
                .into_iter()
                .map(str::to_string)
                .collect(),
            constant_pool_count: class.constant_pool.len(),
            referenced_classes: referenced_classes(class),
            source_file: class.source_file().map(str::to_string),
            fields: class.fields.iter().map(MemberSummary::from).collect(),
            methods: class.methods.iter().map(MemberSummary::from).collect(),
            attributes: class.attributes.iter().map(|a| a.name().to_string()).collect(),
            source: source.map(Entry::to_string),
            size: data.len(),
            content_hash: hash_content(data),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}: {}\n", self.kind, self.class_name));
        out.push_str(&format!(
            "super_class: {}\n",
            self.super_class.as_deref().unwrap_or("-")
        ));
        out.push_str(&format!("interfaces: [{}]\n", self.interfaces.join(", ")));
        out.push_str(&format!("version: {}\n", self.version));
        out.push_str(&format!(
            "access_flags: {} ({})\n",
            self.access_flags,
            self.flags.join(" ")
        ));
        out.push_str(&format!("constant_pool_count: {}\n", self.constant_pool_count));
        out.push_str(&format!(
            "referenced_classes: [{}]\n",
            self.referenced_classes.join(", ")
        ));
        if let Some(source_file) = &self.source_file {
            out.push_str(&format!("source_file: {source_file}\n"));
        }
        if let Some(source) = &self.source {
            out.push_str(&format!("source: {source}\n"));
        }
        out.push_str(&format!("size: {}\n", self.size));
        out.push_str(&format!("content_hash: {}\n", self.content_hash));
        out.push_str(&format!("fields: {}\n", self.fields.len()));
        for f in &self.fields {
            out.push_str(&format!("- {} {} {}\n", f.access_flags, f.name, f.descriptor));
        }
        out.push_str(&format!("methods: {}\n", self.methods.len()));
        for m in &self.methods {
            match m.code_length {
                Some(len) => out.push_str(&format!(
                    "- {} {}{} ({len} bytes of code)\n",
                    m.access_flags, m.name, m.descriptor
                )),
                None => out.push_str(&format!("- {} {}{}\n", m.access_flags, m.name, m.descriptor)),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateReport {
    pub class_name: String,
    pub found: bool,
    pub source: Option<String>,
    pub size: Option<usize>,
    pub content_hash: Option<String>,
}

impl LocateReport {
    pub fn new(class_name: &str, result: &Result<Located<'_>, ClasspathError>) -> Self {
        match result {
            Ok(found) => Self {
                class_name: class_name.to_string(),
                found: true,
                source: Some(found.entry.to_string()),
                size: Some(found.data.len()),
                content_hash: Some(hash_content(&found.data)),
            },
            Err(_) => Self {
                class_name: class_name.to_string(),
                found: false,
                source: None,
                size: None,
                content_hash: None,
            },
        }
    }

    pub fn to_text(&self) -> String {
        match &self.source {
            Some(source) => format!(
                "{}: {} ({} bytes, sha256 {})\n",
                self.class_name,
                source,
                self.size.unwrap_or_default(),
                self.content_hash.as_deref().unwrap_or_default()
            ),
            None => format!("{}: not found\n", self.class_name),
        }
    }
}

/// Every Class constant other than the class itself, in pool order.
fn referenced_classes(class: &ClassFile) -> Vec<String> {
    let this_name = class.class_name();
    class
        .constant_pool
        .iter()
        .filter_map(|(_, constant)| match constant {
            Constant::Class { name_index } => class.constant_pool.utf8(*name_index).ok(),
            _ => None,
        })
        .filter(|name| *name != this_name)
        .map(str::to_string)
        .collect()
}

pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    hex::encode(digest)
}
