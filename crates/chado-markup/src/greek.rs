/// One Greek letter in its three renderings.
#[derive(Debug, Clone, Copy)]
pub struct GreekLetter {
    /// Entity name without `&` and `;`, e.g. `agr`.
    pub entity: &'static str,
    pub unicode: char,
    pub plain: &'static str,
}

const fn letter(entity: &'static str, unicode: char, plain: &'static str) -> GreekLetter {
    GreekLetter {
        entity,
        unicode,
        plain,
    }
}

pub const GREEK_LETTERS: &[GreekLetter] = &[
    letter("agr", 'α', "alpha"),
    letter("bgr", 'β', "beta"),
    letter("ggr", 'γ', "gamma"),
    letter("dgr", 'δ', "delta"),
    letter("egr", 'ε', "epsilon"),
    letter("zgr", 'ζ', "zeta"),
    letter("eegr", 'η', "eta"),
    letter("thgr", 'θ', "theta"),
    letter("igr", 'ι', "iota"),
    letter("kgr", 'κ', "kappa"),
    letter("lgr", 'λ', "lambda"),
    letter("mgr", 'μ', "mu"),
    letter("ngr", 'ν', "nu"),
    letter("xgr", 'ξ', "xi"),
    letter("ogr", 'ο', "omicron"),
    letter("pgr", 'π', "pi"),
    letter("rgr", 'ρ', "rho"),
    letter("sgr", 'σ', "sigma"),
    letter("tgr", 'τ', "tau"),
    letter("ugr", 'υ', "upsilon"),
    letter("phgr", 'φ', "phi"),
    letter("khgr", 'χ', "chi"),
    letter("psgr", 'ψ', "psi"),
    letter("ohgr", 'ω', "omega"),
    letter("Agr", 'Α', "Alpha"),
    letter("Bgr", 'Β', "Beta"),
    letter("Ggr", 'Γ', "Gamma"),
    letter("Dgr", 'Δ', "Delta"),
    letter("Egr", 'Ε', "Epsilon"),
    letter("Zgr", 'Ζ', "Zeta"),
    letter("Eegr", 'Η', "Eta"),
    letter("Thgr", 'Θ', "Theta"),
    letter("Igr", 'Ι', "Iota"),
    letter("Kgr", 'Κ', "Kappa"),
    letter("Lgr", 'Λ', "Lambda"),
    letter("Mgr", 'Μ', "Mu"),
    letter("Ngr", 'Ν', "Nu"),
    letter("Xgr", 'Ξ', "Xi"),
    letter("Ogr", 'Ο', "Omicron"),
    letter("Pgr", 'Π', "Pi"),
    letter("Rgr", 'Ρ', "Rho"),
    letter("Sgr", 'Σ', "Sigma"),
    letter("Tgr", 'Τ', "Tau"),
    letter("Ugr", 'Υ', "Upsilon"),
    letter("Phgr", 'Φ', "Phi"),
    letter("Khgr", 'Χ', "Chi"),
    letter("Psgr", 'Ψ', "Psi"),
    letter("Ohgr", 'Ω', "Omega"),
];

pub fn by_entity(entity: &str) -> Option<&'static GreekLetter> {
    GREEK_LETTERS.iter().find(|l| l.entity == entity)
}

pub fn by_unicode(c: char) -> Option<&'static GreekLetter> {
    GREEK_LETTERS.iter().find(|l| l.unicode == c)
}
