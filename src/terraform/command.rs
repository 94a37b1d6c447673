//! Argument-vector assembly for each supported Terraform operation.
//!
//! Vectors hold everything after the program name, in the order the CLI
//! expects: the optional `-chdir` switch, the operation words, then the
//! operation's flags. Flag order is fixed and load-bearing.

use super::value::format_option;
use super::{BackendConfig, Variables};

pub const PROGRAM: &str = "terraform";

pub fn init(chdir: Option<&str>, backend_config: &BackendConfig, reconfigure: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("init".to_string());
    args.extend(backend_config_flags(backend_config));
    if reconfigure {
        args.push("-reconfigure".to_string());
    }
    args
}

pub fn plan(chdir: Option<&str>, vars: &Variables) -> Vec<String> {
    let mut args = base(chdir);
    args.push("plan".to_string());
    args.extend(var_flags(vars));
    args
}

pub fn apply(chdir: Option<&str>, vars: &Variables, auto_approve: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("apply".to_string());
    args.extend(var_flags(vars));
    if auto_approve {
        args.push("-auto-approve".to_string());
    }
    args
}

pub fn destroy(chdir: Option<&str>, vars: &Variables, auto_approve: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("destroy".to_string());
    args.extend(var_flags(vars));
    if auto_approve {
        args.push("-auto-approve".to_string());
    }
    args
}

pub fn validate(chdir: Option<&str>, json: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("validate".to_string());
    if json {
        args.push("-json".to_string());
    }
    args
}

pub fn output(chdir: Option<&str>, name: Option<&str>, json: bool, raw: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("output".to_string());
    if let Some(name) = name {
        args.push(name.to_string());
    }
    if json {
        args.push("-json".to_string());
    }
    if raw {
        args.push("-raw".to_string());
    }
    args
}

// The one operation spelled as two words; the workspace name goes last.
pub fn select_workspace(chdir: Option<&str>, workspace: &str, or_create: bool) -> Vec<String> {
    let mut args = base(chdir);
    args.push("workspace".to_string());
    args.push("select".to_string());
    if or_create {
        args.push("-or-create=true".to_string());
    }
    args.push(workspace.to_string());
    args
}

fn base(chdir: Option<&str>) -> Vec<String> {
    match chdir {
        Some(dir) => vec![format!("-chdir={dir}")],
        None => Vec::new(),
    }
}

fn var_flags(vars: &Variables) -> Vec<String> {
    vars.iter()
        .map(|(key, value)| format_option("-var", key, value))
        .collect()
}

fn backend_config_flags(backend_config: &BackendConfig) -> Vec<String> {
    match backend_config {
        BackendConfig::File(path) if path.is_empty() => Vec::new(),
        BackendConfig::File(path) => vec![format!("-backend-config={path}")],
        BackendConfig::Map(entries) => entries
            .iter()
            .map(|(key, value)| format_option("-backend-config", key, value))
            .collect(),
    }
}
