use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::User;

// The two durable entries.
const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Durable client-side session storage: the bearer token and the
/// serialized public user profile, under a caller-chosen directory.
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(&self, token: &str, user: &User) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(TOKEN_FILE), token)?;
        let profile = serde_json::to_string(user)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(self.dir.join(USER_FILE), profile)
    }

    /// Both entries must be present and well-formed; anything else reads
    /// as "no stored session".
    pub fn load(&self) -> Option<(String, User)> {
        let token = fs::read_to_string(self.dir.join(TOKEN_FILE)).ok()?;
        let profile = fs::read_to_string(self.dir.join(USER_FILE)).ok()?;
        let user = serde_json::from_str(&profile).ok()?;
        Some((token, user))
    }

    pub fn clear(&self) -> io::Result<()> {
        for file in [TOKEN_FILE, USER_FILE] {
            match fs::remove_file(self.dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
