use crate::config::Settings;
use crate::directive::{ProxyDirective, StreamDirective};

/// Шаблон site-фрагмента для proxy директивы
const SITE_TEMPLATE: &str = r#"server {
    server_name {domains} {www_domains};
    access_log /var/log/nginx/{primary}-access.log;
    error_log /var/log/nginx/{primary}-error.log;

    location / {
        proxy_pass http://{host}:{port};
    }

    listen [::]:443 ssl;
    listen 443 ssl;

    ssl_certificate {ssl_dir}/fullchain.pem;
    ssl_certificate_key {ssl_dir}/privkey.pem;

    include /etc/letsencrypt/options-ssl-nginx.conf;
    ssl_dhparam /etc/letsencrypt/ssl-dhparams.pem;
}
"#;

/// Шаблон upstream блока stream-фрагмента
const STREAM_UPSTREAM_TEMPLATE: &str = r#"
upstream stream_{listen_port} {
    server {host}:{port};
}
"#;

/// Шаблон server блока stream-фрагмента
const STREAM_SERVER_TEMPLATE: &str = r#"
server {
    listen 0.0.0.0:{target_port};
    proxy_pass stream_{listen_port};
}
"#;

/// Рендерит site-фрагмент для proxy директивы. Чистая функция, без файловой системы
pub fn render_site(directive: &ProxyDirective, settings: &Settings) -> String {
    let www_domains = directive
        .domains
        .iter()
        .map(|domain| format!("www.{}", domain))
        .collect::<Vec<_>>()
        .join(" ");
    let primary = directive.primary_domain();

    SITE_TEMPLATE
        .replace("{domains}", &directive.domains.join(" "))
        .replace("{www_domains}", &www_domains)
        .replace("{primary}", primary)
        .replace("{host}", &directive.host)
        .replace("{port}", &directive.port)
        .replace("{ssl_dir}", &settings.ssl_dir_for(primary))
}

/// Рендерит stream-фрагмент: один upstream блок и по server блоку на каждый порт.
/// Все server блоки ссылаются на одну upstream группу, названную по первому порту
pub fn render_stream(directive: &StreamDirective) -> String {
    let listen_port = directive.listen_port();

    let mut text = STREAM_UPSTREAM_TEMPLATE
        .replace("{listen_port}", listen_port)
        .replace("{host}", &directive.host)
        .replace("{port}", &directive.port);

    for target_port in &directive.target_ports {
        text.push('\n');
        text.push_str(
            &STREAM_SERVER_TEMPLATE
                .replace("{target_port}", target_port)
                .replace("{listen_port}", listen_port),
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{parse_line, Directive};

    fn settings() -> Settings {
        Settings::new("/tmp/out", "example.com", "/etc/letsencrypt/live/{tld}")
    }

    fn proxy(line: &str) -> ProxyDirective {
        match parse_line(line, "example.com").unwrap().unwrap() {
            Directive::Proxy(proxy) => proxy,
            other => panic!("expected proxy directive, got {:?}", other),
        }
    }

    fn stream(line: &str) -> StreamDirective {
        match parse_line(line, "example.com").unwrap().unwrap() {
            Directive::Stream(stream) => stream,
            other => panic!("expected stream directive, got {:?}", other),
        }
    }

    #[test]
    fn test_site_fragment() {
        let text = render_site(&proxy("proxy 10.0.0.5:8080 to a,b.other.org"), &settings());

        assert!(text.contains(
            "server_name a.example.com b.other.org www.a.example.com www.b.other.org;"
        ));
        assert!(text.contains("access_log /var/log/nginx/a.example.com-access.log;"));
        assert!(text.contains("error_log /var/log/nginx/a.example.com-error.log;"));
        assert!(text.contains("proxy_pass http://10.0.0.5:8080;"));
        assert!(text.contains("listen [::]:443 ssl;"));
        assert!(text.contains("listen 443 ssl;"));
        assert!(text.contains("ssl_certificate /etc/letsencrypt/live/example.com/fullchain.pem;"));
        assert!(text.contains("ssl_certificate_key /etc/letsencrypt/live/example.com/privkey.pem;"));
        assert!(text.contains("include /etc/letsencrypt/options-ssl-nginx.conf;"));
        assert!(!text.contains("{domains}"));
    }

    #[test]
    fn test_site_fragment_ssl_template_with_domain() {
        let settings = Settings::new("/tmp/out", "example.com", "/certs/{domain}");
        let text = render_site(&proxy("proxy 8080 to x.example.com"), &settings);

        assert!(text.contains("ssl_certificate /certs/x.example.com/fullchain.pem;"));
        assert!(text.contains("ssl_certificate_key /certs/x.example.com/privkey.pem;"));
    }

    #[test]
    fn test_site_fragment_exact_layout() {
        let text = render_site(&proxy("proxy 8080 to api"), &settings());

        let expected = "server {
    server_name api.example.com www.api.example.com;
    access_log /var/log/nginx/api.example.com-access.log;
    error_log /var/log/nginx/api.example.com-error.log;

    location / {
        proxy_pass http://127.0.0.1:8080;
    }

    listen [::]:443 ssl;
    listen 443 ssl;

    ssl_certificate /etc/letsencrypt/live/example.com/fullchain.pem;
    ssl_certificate_key /etc/letsencrypt/live/example.com/privkey.pem;

    include /etc/letsencrypt/options-ssl-nginx.conf;
    ssl_dhparam /etc/letsencrypt/ssl-dhparams.pem;
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_stream_fragment_multiple_ports() {
        let text = render_stream(&stream("stream 10.0.0.5:9000 to 100,200"));

        assert!(text.contains("upstream stream_100 {"));
        assert!(text.contains("server 10.0.0.5:9000;"));
        assert!(text.contains("listen 0.0.0.0:100;"));
        assert!(text.contains("listen 0.0.0.0:200;"));
        // Оба server блока ссылаются на единственную upstream группу
        assert_eq!(text.matches("proxy_pass stream_100;").count(), 2);
        assert!(!text.contains("stream_200"));
    }

    #[test]
    fn test_stream_fragment_single_port() {
        let text = render_stream(&stream("stream 10.0.0.5:9000"));

        let expected = "
upstream stream_9000 {
    server 10.0.0.5:9000;
}


server {
    listen 0.0.0.0:9000;
    proxy_pass stream_9000;
}
";
        assert_eq!(text, expected);
    }
}
