use thiserror::Error;

/// Одна распознанная строка входного файла
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Stream(StreamDirective),
    Proxy(ProxyDirective),
}

/// Директива `stream host:port [to port1,port2,...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDirective {
    pub host: String,
    /// Порт из второго токена (host:port), на него указывает upstream
    pub port: String,
    /// Порты, на которых слушают server-блоки; не пустой по построению
    pub target_ports: Vec<String>,
}

impl StreamDirective {
    /// Первый порт списка: имя upstream группы и имя выходного файла
    pub fn listen_port(&self) -> &str {
        &self.target_ports[0]
    }
}

/// Директива `proxy [host:]port to domain1,domain2,...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDirective {
    pub host: String,
    pub port: String,
    /// Домены с уже подставленным TLD по умолчанию; не пустой по построению
    pub domains: Vec<String>,
}

impl ProxyDirective {
    /// Первый домен: имя выходного файла, логов и {domain} в SSL шаблоне
    pub fn primary_domain(&self) -> &str {
        &self.domains[0]
    }
}

/// Исправимая проблема в одной строке: строка пропускается, обработка продолжается
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseWarning {
    #[error("you must supply a host to stream from ({0})")]
    MissingStreamHost(String),

    #[error("you must supply a port to stream to after specifying 'to' ({0})")]
    MissingTargetPorts(String),
}

/// Разбирает одну строку входного файла.
///
/// `Ok(None)` означает нераспознанную строку, она молча пропускается.
/// `Err` означает предупреждение: строка пропускается, но о ней сообщается.
pub fn parse_line(line: &str, default_domain: &str) -> Result<Option<Directive>, ParseWarning> {
    let parts: Vec<&str> = line.split(' ').map(str::trim).collect();

    match parts.first() {
        Some(&"stream") => parse_stream(line, &parts),
        Some(&"proxy") if parts.get(2) == Some(&"to") => Ok(parse_proxy(&parts, default_domain)),
        _ => Ok(None),
    }
}

/// Разбирает `stream host:port [to ports]`
fn parse_stream(line: &str, parts: &[&str]) -> Result<Option<Directive>, ParseWarning> {
    let endpoint = parts.get(1).copied().unwrap_or("");
    let (host, port) = match endpoint.split_once(':') {
        Some((host, port)) => (host, port),
        None => (endpoint, ""),
    };

    if host.is_empty() {
        return Err(ParseWarning::MissingStreamHost(line.to_string()));
    }

    let target_ports: Vec<String> = if parts.get(2) == Some(&"to") {
        match parts.get(3) {
            Some(list) => list.split(',').map(str::to_string).collect(),
            None => return Err(ParseWarning::MissingTargetPorts(line.to_string())),
        }
    } else {
        vec![port.to_string()]
    };

    Ok(Some(Directive::Stream(StreamDirective {
        host: host.to_string(),
        port: port.to_string(),
        target_ports,
    })))
}

/// Разбирает `proxy [host:]port to domains`; вызывается только если третий токен равен `to`
fn parse_proxy(parts: &[&str], default_domain: &str) -> Option<Directive> {
    let list = parts.get(3)?;
    let endpoint = parts[1];

    // Без хоста (нет двоеточия или пустая часть после него) проксируем на localhost
    let (host, port) = match endpoint.split_once(':') {
        Some((host, port)) if !port.is_empty() => (host.to_string(), port.to_string()),
        Some((port, _)) => ("127.0.0.1".to_string(), port.to_string()),
        None => ("127.0.0.1".to_string(), endpoint.to_string()),
    };

    let domains: Vec<String> = list
        .split(',')
        .map(|domain| {
            if domain.contains('.') {
                domain.to_string()
            } else {
                format!("{}.{}", domain, default_domain)
            }
        })
        .collect();

    Some(Directive::Proxy(ProxyDirective { host, port, domains }))
}
