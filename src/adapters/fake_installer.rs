//! Scriptable installer for testing dispatch without any card

#[cfg(test)]
use std::io::Read;

#[cfg(test)]
use crate::error::InstallerError;
#[cfg(test)]
use crate::model::Secrets;
#[cfg(test)]
use crate::ports::Installer;

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FakeInstaller {
    pub installed: bool,
    pub secrets: Secrets,
    /// Every operation fails with this reason when set
    pub failure: Option<String>,
    pub installed_bytes: Option<Vec<u8>>,
    pub calls: Vec<&'static str>,
}

#[cfg(test)]
impl Default for FakeInstaller {
    fn default() -> Self {
        Self {
            installed: false,
            secrets: Secrets::new("123456", "123456789012", "0123456789abcdef"),
            failure: None,
            installed_bytes: None,
            calls: Vec::new(),
        }
    }
}

#[cfg(test)]
impl FakeInstaller {
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    fn enter(&mut self, call: &'static str) -> Result<(), InstallerError> {
        self.calls.push(call);
        match &self.failure {
            Some(reason) => Err(InstallerError::Rejected {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl Installer for FakeInstaller {
    fn install(&mut self, cap_file: &mut dyn Read, overwrite: bool) -> Result<(), InstallerError> {
        self.enter("install")?;
        if self.installed && !overwrite {
            return Err(InstallerError::AlreadyInstalled);
        }
        let mut bytes = Vec::new();
        cap_file
            .read_to_end(&mut bytes)
            .map_err(|source| InstallerError::CapFileRead { source })?;
        self.installed_bytes = Some(bytes);
        self.installed = true;
        Ok(())
    }

    fn info(&mut self) -> Result<bool, InstallerError> {
        self.enter("info")?;
        Ok(self.installed)
    }

    fn delete(&mut self) -> Result<(), InstallerError> {
        self.enter("delete")?;
        self.installed = false;
        Ok(())
    }

    fn init(&mut self) -> Result<Secrets, InstallerError> {
        self.enter("init")?;
        if !self.installed {
            return Err(InstallerError::NotInstalled);
        }
        Ok(self.secrets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::installer_contract;

    contract_tests_for!(
        fake_installer_contract,
        make = FakeInstaller::default,
        tests = {
            test_info_reports_absent_applet => installer_contract::test_info_reports_absent_applet,
            test_install_then_info => installer_contract::test_install_then_info,
            test_install_refuses_without_overwrite => installer_contract::test_install_refuses_without_overwrite,
            test_install_with_overwrite_replaces => installer_contract::test_install_with_overwrite_replaces,
            test_delete_removes_applet => installer_contract::test_delete_removes_applet,
            test_delete_absent_applet_is_tolerated => installer_contract::test_delete_absent_applet_is_tolerated,
            test_init_requires_installed_applet => installer_contract::test_init_requires_installed_applet,
            test_init_returns_fresh_secrets => installer_contract::test_init_returns_fresh_secrets,
        }
    );
}
