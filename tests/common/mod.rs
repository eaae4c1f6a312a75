#![allow(dead_code)]

pub mod command;
pub mod file;

/// Blob id git computes for `"hello\n"`
pub const HELLO_BLOB_ID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

/// Root tree git computes for `a.txt` = `"a\n"` and `b/c.txt` = `"c\n"`
pub const SAMPLE_TREE_ID: &str = "c2daa5be1e28bc1bca9f595f0471c39598232e72";

/// Tree git computes for a directory holding only `c.txt` = `"c\n"`
pub const SAMPLE_SUBTREE_ID: &str = "cf67e9ef3a0fc6d858423fc177f2fbbe985a6f17";

/// Trim the trailing newline of a command's stdout
pub fn stdout_line(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}
