use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use crate::config::Settings;
use crate::directive::{parse_line, Directive, ProxyDirective, StreamDirective};
use crate::render::{render_site, render_stream};

/// Пишет сгенерированные фрагменты в sites/ и streams/ под выходным корнем
pub struct Generator {
    settings: Settings,
}

impl Generator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Создает sites/ и streams/, если их еще нет.
    /// Вызывается только после успешного чтения входного файла
    pub fn prepare_directories(&self) -> Result<(), Box<dyn std::error::Error>> {
        fs::create_dir_all(self.settings.sites_dir())?;
        fs::create_dir_all(self.settings.streams_dir())?;
        debug!("Output directories ready under {}", self.settings.out_dir.display());
        Ok(())
    }

    /// Обрабатывает весь входной файл: строка -> директива -> фрагмент -> файл.
    /// Предупреждения печатаются в stdout, строка пропускается, обработка продолжается
    pub fn process(&self, in_data: &str) -> Result<(), Box<dyn std::error::Error>> {
        for line in in_data.lines() {
            match parse_line(line, &self.settings.default_domain) {
                Ok(Some(directive)) => {
                    self.apply(&directive)?;
                }
                Ok(None) => {
                    // Нераспознанные строки молча пропускаются
                }
                Err(warning) => {
                    println!("Warning: {}", warning);
                }
            }
        }

        Ok(())
    }

    /// Рендерит и записывает одну директиву, возвращает путь записанного файла
    pub fn apply(&self, directive: &Directive) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match directive {
            Directive::Stream(stream) => self.apply_stream(stream),
            Directive::Proxy(proxy) => self.apply_proxy(proxy),
        }
    }

    fn apply_stream(&self, stream: &StreamDirective) -> Result<PathBuf, Box<dyn std::error::Error>> {
        // Напоминание называет только первый порт списка
        println!(
            "Streaming {}:{}. Please remember to run 'ufw allow {}' for each specified port \
             (or another command to unrestrict the port if your firewall is not ufw)",
            stream.host,
            stream.port,
            stream.listen_port()
        );

        let path = self.settings.streams_dir().join(stream.listen_port());
        fs::write(&path, render_stream(stream))?;
        info!("Wrote stream config to {}", path.display());
        Ok(path)
    }

    fn apply_proxy(&self, proxy: &ProxyDirective) -> Result<PathBuf, Box<dyn std::error::Error>> {
        println!("Proxying {}:{}", proxy.host, proxy.port);

        let path = self.settings.sites_dir().join(proxy.primary_domain());
        fs::write(&path, render_site(proxy, &self.settings))?;
        info!("Wrote site config to {}", path.display());
        Ok(path)
    }
}
