use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Настройки генератора, собранные из аргументов командной строки
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Корневая директория для sites/ и streams/
    pub out_dir: PathBuf,
    /// Домен по умолчанию, добавляется к доменам без точки
    pub default_domain: String,
    /// Шаблон директории SSL сертификатов, поддерживает {tld} и {domain}
    pub ssl_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("/etc/nginx/generated"),
            default_domain: "clicksminuteper.net".to_string(),
            ssl_dir: "/etc/letsencrypt/live/{tld}".to_string(),
        }
    }
}

impl Settings {
    pub fn new<P: AsRef<Path>>(out_dir: P, default_domain: &str, ssl_dir: &str) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            default_domain: default_domain.to_string(),
            ssl_dir: ssl_dir.to_string(),
        }
    }

    /// Директория для site-фрагментов
    pub fn sites_dir(&self) -> PathBuf {
        self.out_dir.join("sites")
    }

    /// Директория для stream-фрагментов
    pub fn streams_dir(&self) -> PathBuf {
        self.out_dir.join("streams")
    }

    /// Подставляет {tld} и {domain} в шаблон SSL директории
    pub fn ssl_dir_for(&self, primary_domain: &str) -> String {
        self.ssl_dir
            .replace("{tld}", &self.default_domain)
            .replace("{domain}", primary_domain)
    }
}
