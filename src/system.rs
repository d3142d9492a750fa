//! OS identity collaborator
//!
//! The one-line identity `uname` prints. Collected once per call via
//! `uname(2)`; the shell consumes it as three opaque strings.

/// `{system} {node} {release}` triplet.
#[derive(Debug, Clone)]
pub struct OsIdentity {
    pub system: String,
    pub node: String,
    pub release: String,
}

impl OsIdentity {
    #[cfg(unix)]
    pub fn collect() -> Self {
        let mut info: libc::utsname = unsafe { std::mem::zeroed() };
        if unsafe { libc::uname(&mut info) } != 0 {
            return Self::unknown();
        }
        Self {
            system: field_to_string(&info.sysname),
            node: field_to_string(&info.nodename),
            release: field_to_string(&info.release),
        }
    }

    #[cfg(not(unix))]
    pub fn collect() -> Self {
        Self::unknown()
    }

    fn unknown() -> Self {
        Self {
            system: "unknown".to_string(),
            node: "unknown".to_string(),
            release: "unknown".to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {} {}", self.system, self.node, self.release)
    }
}

#[cfg(unix)]
fn field_to_string(field: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
