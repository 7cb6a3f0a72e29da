use crate::models::Source;
use reqwest::Url;

/// Host fragments of the sites we know, checked in order
const KNOWN_HOSTS: &[(&str, Source)] = &[
    ("bienici", Source::Bienici),
    ("seloger", Source::Seloger),
    ("leboncoin", Source::Leboncoin),
    ("pap.fr", Source::Pap),
    ("figaro", Source::Figaro),
    ("bellesdemeures", Source::Figaro),
    ("barnes", Source::Barnes),
];

/// Map a listing URL to the site it came from.
///
/// Anything without a recognizable host is `Source::Other`.
pub fn classify(url: &str) -> Source {
    let host = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.host_str().map(str::to_lowercase).unwrap_or_default(),
        Err(_) => return Source::Other,
    };

    KNOWN_HOSTS
        .iter()
        .find(|(fragment, _)| host.contains(fragment))
        .map(|(_, source)| *source)
        .unwrap_or(Source::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sites() {
        assert_eq!(
            classify("https://www.bienici.com/annonce/vente/marseille-6e/appartement/4pieces/abc"),
            Source::Bienici
        );
        assert_eq!(classify("https://www.SeLoger.com/annonces/1.htm"), Source::Seloger);
        assert_eq!(classify("https://www.leboncoin.fr/ad/ventes_immobilieres/42"), Source::Leboncoin);
        assert_eq!(classify("https://www.pap.fr/annonces/appartement-marseille-r42"), Source::Pap);
        assert_eq!(classify("https://immobilier.lefigaro.fr/annonces/1"), Source::Figaro);
        assert_eq!(classify("https://www.bellesdemeures.com/annonces/1"), Source::Figaro);
        assert_eq!(classify("https://www.barnes-marseille.com/vente/1"), Source::Barnes);
    }

    #[test]
    fn only_the_host_is_inspected() {
        assert_eq!(classify("https://example.com/redirect?to=seloger"), Source::Other);
        assert_eq!(classify("https://www.paprika.com/pap.fr"), Source::Other);
    }

    #[test]
    fn garbage_is_other() {
        assert_eq!(classify(""), Source::Other);
        assert_eq!(classify("not a url"), Source::Other);
        assert_eq!(classify("www.seloger.com/annonces/1"), Source::Other);
        assert_eq!(classify("mailto:agence@seloger.com"), Source::Other);
    }
}
