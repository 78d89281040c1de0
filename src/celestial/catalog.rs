//! The 57 navigational stars of the nautical almanac, plus Polaris.
//!
//! Mean positions at J2000.0, right ascension and declination in radians.

/// Index of a star in [`NAVIGATIONAL_STARS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StarId(u8);

/// A catalogued star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStar {
    pub name: &'static str,
    /// Right ascension at J2000.0, radians.
    pub ra: f64,
    /// Declination at J2000.0, radians.
    pub dec: f64,
}

const fn star(name: &'static str, ra: f64, dec: f64) -> CatalogStar {
    CatalogStar { name, ra, dec }
}

pub const NAVIGATIONAL_STARS: [CatalogStar; 58] = [
    star("Alpheratz", 0.0365979981624047, 0.508585349622516),
    star("Ankaa", 0.289219237568502, -0.738378993348721),
    star("Schedar", 0.176746620828405, 0.986762578179113),
    star("Diphda", 0.190182710825649, -0.284027125450659),
    star("Achernar", 0.426358483543957, -0.998969740640864),
    star("Hamal", 0.554898863177301, 0.409496532815273),
    star("Polaris", 0.662403356568365, 1.55795361238231),
    star("Acamar", 0.777812962468281, -0.703449961435399),
    star("Menkar", 0.795346540133816, 0.071379118269757),
    star("Mirfak", 0.891528726329137, 0.870240557591617),
    star("Aldebaran", 1.20393095418572, 0.288141690680868),
    star("Rigel", 1.37243034888306, -0.143145651152089),
    star("Capella", 1.38181782770328, 0.802816394191974),
    star("Bellatrix", 1.41865452145751, 0.110823559364829),
    star("Elnath", 1.42371695076379, 0.499297460743863),
    star("Alnilam", 1.46700741394297, -0.0209774031679285),
    star("Betelgeuse", 1.54972913370916, 0.129277633374139),
    star("Canopus", 1.67530590791159, -0.919712778207749),
    star("Sirius", 1.76779435200004, -0.291751259436422),
    star("Adhara", 1.82660341749553, -0.505655821260435),
    star("Procyon", 2.00406704139727, 0.0911692127326482),
    star("Pollux", 2.03035606325544, 0.489152763555466),
    star("Avior", 2.19262805045961, -1.03864058972501),
    star("Suhail", 2.3910865308218, -0.758040127372437),
    star("Miaplacidus", 2.41379035550816, -1.21679507312234),
    star("Alphard", 2.47656717980308, -0.151121122246412),
    star("Regulus", 2.65435490407471, 0.20886743009561),
    star("Dubhe", 2.89606231357453, 1.07775520296312),
    star("Denebola", 3.09385626957378, 0.254330430646302),
    star("Gienah", 3.21056008074728, -0.306164425958095),
    star("Acrux", 3.25764947120958, -1.10128690460105),
    star("Gacrux", 3.2775756189358, -0.996815713455695),
    star("Alioth", 3.37732845789249, 0.97668334053394),
    star("Spica", 3.51331719009724, -0.194801816805651),
    star("Alkaid", 3.61082442298847, 0.860680031800137),
    star("Hadar", 3.68187386795507, -1.0537085989339),
    star("Menkent", 3.69437478872248, -0.634753462707325),
    star("Arcturus", 3.73352834160889, 0.334792935627001),
    star("Rigil", 3.83801502982356, -1.06175315112964),
    star("Zubenelgenubi", 3.88635809755977, -0.279201774882576),
    star("Kochab", 3.88643372849402, 1.29425860309002),
    star("Alphecca", 4.07834490432777, 0.466259352479109),
    star("Antares", 4.31707190480797, -0.461324458259779),
    star("Atria", 4.40113132490715, -1.2047619975572),
    star("Sabik", 4.49587361446958, -0.274451570435065),
    star("Shaula", 4.59724088298436, -0.647730470509584),
    star("Rasalhague", 4.6030222861316, 0.219213354050488),
    star("Eltanin", 4.6975827705636, 0.898652093745679),
    star("Kaus Australis", 4.81785922708271, -0.600124675906715),
    star("Vega", 4.87356551168385, 0.676903120509757),
    star("Nunki", 4.95353021482492, -0.458964385260138),
    star("Altair", 5.1957723884129, 0.154781417057421),
    star("Peacock", 5.34789972206191, -0.964556211114666),
    star("Deneb", 5.41676750546352, 0.790289933439844),
    star("Enif", 5.69058479415959, 0.172351457559912),
    star("Al Na'ir", 5.7955112253515, -0.819623585215376),
    star("Fomalhaut", 6.01113938223019, -0.517005309535209),
    star("Markab", 6.04216260968439, 0.265381676088868),
];

impl StarId {
    /// Look a star up by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<StarId> {
        let name = name.trim();
        NAVIGATIONAL_STARS
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
            .map(|i| StarId(i as u8))
    }

    pub fn name(&self) -> &'static str {
        self.star().name
    }

    pub fn star(&self) -> &'static CatalogStar {
        &NAVIGATIONAL_STARS[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = StarId> {
        (0..NAVIGATIONAL_STARS.len()).map(|i| StarId(i as u8))
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn test_lookup() {
        let sirius = StarId::from_name("sirius").unwrap();
        assert_eq!(sirius.name(), "Sirius");
        assert_eq!(sirius.star().dec, -0.291751259436422);
        assert_eq!(StarId::from_name("Al Na'ir").unwrap().name(), "Al Na'ir");
        assert!(StarId::from_name("Xyzzy").is_none());
    }

    #[test]
    fn test_catalog_is_consistent() {
        assert_eq!(StarId::all().count(), 58);
        for id in StarId::all() {
            let s = id.star();
            assert!((0.0..std::f64::consts::TAU).contains(&s.ra), "{}", s.name);
            assert!(s.dec.abs() <= std::f64::consts::FRAC_PI_2, "{}", s.name);
            assert_eq!(StarId::from_name(s.name), Some(id));
        }
    }

    #[test]
    fn test_dubhe_and_shaula_positions() {
        // Dubhe: 11h03m43.7s +61°45'04"; Shaula: 17h33m36.5s −37°06'14"
        let dubhe = StarId::from_name("Dubhe").unwrap().star();
        assert!((dubhe.ra.to_degrees() - 165.932).abs() < 0.01);
        assert!((dubhe.dec.to_degrees() - 61.751).abs() < 0.01);

        let shaula = StarId::from_name("Shaula").unwrap().star();
        assert!((shaula.dec.to_degrees() + 37.104).abs() < 0.02);
    }
}
