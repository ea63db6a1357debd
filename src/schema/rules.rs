//! Compiled element rules for the three PADnext documents.
//!
//! Each rule lists the allowed attributes and either a simple-typed value or
//! an ordered sequence of child particles with cardinalities.

#[derive(Debug, Clone, Copy)]
pub(crate) enum Facet {
    Text { min: usize, max: usize },
    /// Unsigned integer written with at most `max` digits.
    Digits { max: usize },
    Decimal { total: u32, fraction: u32 },
    Enum(&'static [&'static str]),
    Date,
    DateTime,
    Time,
    Bool,
    Sha1Hex,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Occurs {
    pub min: u32,
    pub max: u32,
}

pub(crate) const ONE: Occurs = Occurs { min: 1, max: 1 };
pub(crate) const OPT: Occurs = Occurs { min: 0, max: 1 };
pub(crate) const ANY: Occurs = Occurs { min: 0, max: u32::MAX };
pub(crate) const SOME: Occurs = Occurs { min: 1, max: u32::MAX };

#[derive(Debug)]
pub(crate) struct AttrRule {
    pub name: &'static str,
    pub required: bool,
    pub facet: Facet,
}

#[derive(Debug)]
pub(crate) enum Particle {
    Element {
        name: &'static str,
        occurs: Occurs,
        rule: &'static ElementRule,
    },
    Choice {
        occurs: Occurs,
        options: &'static [(&'static str, &'static ElementRule)],
    },
}

#[derive(Debug)]
pub(crate) enum Content {
    Empty,
    Simple(Facet),
    Sequence(&'static [Particle]),
}

#[derive(Debug)]
pub(crate) struct ElementRule {
    pub attrs: &'static [AttrRule],
    pub content: Content,
}

macro_rules! el {
    ($name:literal, $occurs:expr, $rule:expr) => {
        Particle::Element {
            name: $name,
            occurs: $occurs,
            rule: &$rule,
        }
    };
}

macro_rules! req {
    ($name:literal, $facet:expr) => {
        AttrRule {
            name: $name,
            required: true,
            facet: $facet,
        }
    };
}

macro_rules! opt {
    ($name:literal, $facet:expr) => {
        AttrRule {
            name: $name,
            required: false,
            facet: $facet,
        }
    };
}

macro_rules! simple {
    ($facet:expr) => {
        ElementRule {
            attrs: &[],
            content: Content::Simple($facet),
        }
    };
}

// ---------------------------------------------------------------------------
// Simple types
// ---------------------------------------------------------------------------

const AMOUNT: Facet = Facet::Decimal { total: 9, fraction: 2 };
const PERCENT: Facet = Facet::Decimal { total: 4, fraction: 2 };

const T3: ElementRule = simple!(Facet::Text { min: 1, max: 3 });
const T9: ElementRule = simple!(Facet::Text { min: 1, max: 9 });
const T10: ElementRule = simple!(Facet::Text { min: 1, max: 10 });
const T12: ElementRule = simple!(Facet::Text { min: 1, max: 12 });
const T20: ElementRule = simple!(Facet::Text { min: 1, max: 20 });
const T28: ElementRule = simple!(Facet::Text { min: 1, max: 28 });
const T34: ElementRule = simple!(Facet::Text { min: 15, max: 34 });
const T35: ElementRule = simple!(Facet::Text { min: 1, max: 35 });
const T40: ElementRule = simple!(Facet::Text { min: 1, max: 40 });
const T46: ElementRule = simple!(Facet::Text { min: 1, max: 46 });
const T60: ElementRule = simple!(Facet::Text { min: 1, max: 60 });
const T70: ElementRule = simple!(Facet::Text { min: 1, max: 70 });
const T120: ElementRule = simple!(Facet::Text { min: 1, max: 120 });
const T4000: ElementRule = simple!(Facet::Text { min: 1, max: 4000 });
const BIC: ElementRule = simple!(Facet::Text { min: 8, max: 11 });

const D3: ElementRule = simple!(Facet::Digits { max: 3 });
const D4: ElementRule = simple!(Facet::Digits { max: 4 });
const D5: ElementRule = simple!(Facet::Digits { max: 5 });
const D9: ElementRule = simple!(Facet::Digits { max: 9 });
const D20: ElementRule = simple!(Facet::Digits { max: 20 });

const DATE: ElementRule = simple!(Facet::Date);
const DATETIME: ElementRule = simple!(Facet::DateTime);
const TIME: ElementRule = simple!(Facet::Time);
const MONEY: ElementRule = simple!(AMOUNT);
const RATE: ElementRule = simple!(PERCENT);

const SEX: ElementRule = simple!(Facet::Enum(&["m", "w", "u"]));
const REDUCTION: ElementRule = simple!(Facet::Enum(&["0", "15", "25"]));
const TREATMENT: ElementRule = simple!(Facet::Enum(&["0", "1", "2", "3", "4", "5"]));

// ---------------------------------------------------------------------------
// auftrag
// ---------------------------------------------------------------------------

const PARTICIPANT_ID: ElementRule = ElementRule {
    attrs: &[
        opt!("kundennr", Facet::Digits { max: 20 }),
        opt!("rzid", Facet::Digits { max: 4 }),
        opt!("iknr", Facet::Digits { max: 9 }),
    ],
    content: Content::Simple(Facet::Text { min: 1, max: 40 }),
};

const PARTICIPANT: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("logisch", ONE, PARTICIPANT_ID),
        el!("physikalisch", ONE, PARTICIPANT_ID),
    ]),
};

const MESSAGE_TYPE: ElementRule = ElementRule {
    attrs: &[req!("version", Facet::Text { min: 1, max: 5 })],
    content: Content::Simple(Facet::Enum(&["ADL", "QADL"])),
};

const SYSTEM: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("produkt", ONE, T40),
        el!("version", ONE, T20),
        el!("hersteller", ONE, T40),
        el!("zertifizierungsnr", OPT, T20),
    ]),
};

// `verfahren` is only checked for shape here; unknown procedures surface
// as a crypto error when the manifest is read.
const ENCRYPTION: ElementRule = ElementRule {
    attrs: &[
        req!("verfahren", Facet::Digits { max: 1 }),
        req!("idcert", Facet::Text { min: 1, max: 128 }),
    ],
    content: Content::Empty,
};

const RECEIPT_REQUEST: ElementRule = ElementRule {
    attrs: &[opt!("email", Facet::Text { min: 1, max: 100 })],
    content: Content::Simple(Facet::Bool),
};

const DOCUMENT_TYPE: ElementRule = ElementRule {
    attrs: &[opt!("format", Facet::Enum(&["pdf", "jpeg", "tiff"]))],
    content: Content::Simple(Facet::Enum(&["PADneXt", "PAD", "Anhang", "PADdent"])),
};

const FILE_LENGTH: ElementRule = ElementRule {
    attrs: &[
        req!("laenge", Facet::Digits { max: 20 }),
        req!("pruefsumme", Facet::Sha1Hex),
    ],
    content: Content::Empty,
};

const FILE: ElementRule = ElementRule {
    attrs: &[
        opt!("id", Facet::Text { min: 1, max: 40 }),
        opt!("erstellungsdatum", Facet::DateTime),
    ],
    content: Content::Sequence(&[
        el!("dokumententyp", ONE, DOCUMENT_TYPE),
        el!("name", ONE, T40),
        el!("beschreibung", OPT, T60),
        el!("dateilaenge", ONE, FILE_LENGTH),
    ]),
};

pub(crate) const AUFTRAG: ElementRule = ElementRule {
    attrs: &[
        req!("erstellungsdatum", Facet::DateTime),
        req!("transfernr", Facet::Digits { max: 6 }),
        req!("echtdaten", Facet::Bool),
        req!("dateianzahl", Facet::Digits { max: 4 }),
    ],
    content: Content::Sequence(&[
        el!("empfaenger", ONE, PARTICIPANT),
        el!("absender", ONE, PARTICIPANT),
        el!("nachrichtentyp", ONE, MESSAGE_TYPE),
        el!("system", ONE, SYSTEM),
        el!("verschluesselung", ONE, ENCRYPTION),
        el!("empfangsquittung", ONE, RECEIPT_REQUEST),
        el!("datei", Occurs { min: 1, max: 9999 }, FILE),
    ]),
};

// ---------------------------------------------------------------------------
// quittung
// ---------------------------------------------------------------------------

const RECEIPT_ERROR: ElementRule = ElementRule {
    attrs: &[
        req!("code", Facet::Digits { max: 9 }),
        req!("text", Facet::Text { min: 1, max: 4000 }),
        opt!("hinweis", Facet::Text { min: 1, max: 4000 }),
    ],
    content: Content::Empty,
};

pub(crate) const QUITTUNG: ElementRule = ElementRule {
    attrs: &[
        req!("datenlieferung", Facet::Digits { max: 6 }),
        req!("dateianzahl", Facet::Digits { max: 4 }),
        req!("rechnungsanzahl", Facet::Digits { max: 6 }),
    ],
    content: Content::Sequence(&[
        el!("nachrichtentyp", ONE, simple!(Facet::Enum(&["QADL"]))),
        el!("eingangsdatum", ONE, DATETIME),
        el!("status", ONE, simple!(Facet::Enum(&["0", "1"]))),
        el!("fehler", ANY, RECEIPT_ERROR),
    ]),
};

// ---------------------------------------------------------------------------
// rechnungen: parties
// ---------------------------------------------------------------------------

const HOUSE_ADDRESS: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("land", OPT, T3),
        el!("zusatz", OPT, T40),
        el!("plz", ONE, T10),
        el!("ort", ONE, T40),
        el!("strasse", OPT, T46),
        el!("hausnr", OPT, T9),
    ]),
};

const ADDRESS: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[el!("hausadresse", ONE, HOUSE_ADDRESS)]),
};

const CONTACT: ElementRule = ElementRule {
    attrs: &[opt!(
        "art",
        Facet::Enum(&["telefonnr", "mobilnr", "faxnr", "email"])
    )],
    content: Content::Simple(Facet::Text { min: 1, max: 100 }),
};

const ISSUER: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("name", ONE, T40),
        el!("namezusatz", ANY, T40),
        el!("kundennr", ONE, D20),
        el!("anschrift", ONE, ADDRESS),
        el!("iknr", OPT, D9),
        el!("kontakt", ANY, CONTACT),
        el!("ustidnr", OPT, simple!(Facet::Text { min: 1, max: 15 })),
        el!("glaeubigerid", OPT, T40),
    ]),
};

const PROVIDER: ElementRule = ElementRule {
    attrs: &[
        req!("id", Facet::Text { min: 1, max: 40 }),
        opt!("aisid", Facet::Text { min: 1, max: 40 }),
    ],
    content: Content::Sequence(&[
        el!("anrede", OPT, T40),
        el!("titel", OPT, T20),
        el!("vorname", OPT, T40),
        el!("name", ONE, T40),
        el!("namezusatz", OPT, T20),
        el!("gebdatum", OPT, DATE),
        el!("geschlecht", OPT, SEX),
        el!("anschrift", OPT, ADDRESS),
        el!("kundennr", OPT, D20),
        el!("lanr", ANY, D9),
        el!("ustidnr", OPT, simple!(Facet::Text { min: 1, max: 15 })),
        el!("iknr", OPT, D9),
    ]),
};

const RECIPIENT_PERSON: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("anrede", OPT, T40),
        el!("titel", OPT, T20),
        el!("vorname", OPT, T40),
        el!("name", ONE, T40),
        el!("namezusatz", OPT, T20),
        el!("gebdatum", OPT, DATE),
        el!("geschlecht", OPT, SEX),
        el!("anschrift", ONE, ADDRESS),
    ]),
};

const ORGANISATION: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[el!("name", ONE, T120), el!("anschrift", ONE, ADDRESS)]),
};

const RECIPIENT: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[Particle::Choice {
        occurs: ONE,
        options: &[("person", &RECIPIENT_PERSON), ("organisation", &ORGANISATION)],
    }]),
};

// ---------------------------------------------------------------------------
// rechnungen: invoice
// ---------------------------------------------------------------------------

const BANK_ACCOUNT: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("inhaber", OPT, T70),
        el!("bank", OPT, T70),
        el!("bic", OPT, BIC),
        el!("iban", ONE, T34),
        el!("mandatsreferenz", OPT, T35),
    ]),
};

const PAYMENT: ElementRule = ElementRule {
    attrs: &[opt!("art", Facet::Enum(&["Lastschrift"]))],
    content: Content::Sequence(&[el!("kontoverbindung", OPT, BANK_ACCOUNT)]),
};

const DISCOUNT: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("betrag", OPT, MONEY),
        el!("prozent", OPT, simple!(Facet::Decimal { total: 5, fraction: 2 })),
    ]),
};

const COPAYMENT: ElementRule = ElementRule {
    attrs: &[req!("kennzeichen", Facet::Text { min: 1, max: 1 })],
    content: Content::Simple(AMOUNT),
};

const ADJUSTMENTS: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("direktzahlungsbetrag", OPT, MONEY),
        el!("nachlass", OPT, DISCOUNT),
        el!("zuzahlungsbetrag", OPT, COPAYMENT),
    ]),
};

const INVOICE: ElementRule = ElementRule {
    attrs: &[
        req!("id", Facet::Text { min: 1, max: 40 }),
        opt!("druckkennzeichen", Facet::Bool),
        opt!("eabgabe", Facet::Bool),
        opt!("aisrechnungsnr", Facet::Text { min: 1, max: 14 }),
        opt!("aisaktenzeichen", Facet::Text { min: 1, max: 40 }),
        opt!("aisendbetrag", AMOUNT),
    ],
    content: Content::Sequence(&[
        el!("rechnungsempfaenger", ONE, RECIPIENT),
        el!("zahlung", OPT, PAYMENT),
        el!("rechnungsvorgaben", OPT, ADJUSTMENTS),
        el!("abrechnungsfall", SOME, CASE),
        el!("anfangstext", OPT, T4000),
        el!("endetext", OPT, T4000),
    ]),
};

// ---------------------------------------------------------------------------
// rechnungen: billing cases
// ---------------------------------------------------------------------------

const PATIENT: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("anrede", OPT, T40),
        el!("titel", OPT, T20),
        el!("vorname", OPT, T40),
        el!("name", ONE, T40),
        el!("namezusatz", OPT, T20),
        el!("gebdatum", OPT, DATE),
        el!("geschlecht", OPT, SEX),
    ]),
};

const INSURED: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("anrede", OPT, T40),
        el!("titel", OPT, T20),
        el!("vorname", OPT, T40),
        el!("name", ONE, T40),
        el!("namezusatz", OPT, T20),
        el!("gebdatum", OPT, DATE),
        el!("geschlecht", OPT, SEX),
        el!("anschrift", OPT, ADDRESS),
    ]),
};

const PERIOD: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[el!("startdatum", ONE, DATE), el!("endedatum", ONE, DATE)]),
};

const DIAGNOSIS: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[el!("text", ONE, T4000), el!("code", OPT, T12)]),
};

const HEALTH_CARD: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("kassenname", ONE, T28),
        el!("kassennr", OPT, D9),
        el!("versichertennr", OPT, T12),
    ]),
};

const SUMS: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("honorar", ONE, MONEY),
        el!("auslagen", OPT, MONEY),
        el!("entschaedigung", OPT, MONEY),
        el!("rechnungsbetrag", ONE, MONEY),
        el!("vorauszahlung", OPT, MONEY),
        el!("minderungsbetrag", OPT, MONEY),
        el!("zahlbetrag", ONE, MONEY),
    ]),
};

const HUMAN_MEDICINE: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("behandelter", ONE, PATIENT),
        el!("versicherter", OPT, INSURED),
        el!("zeitraum", OPT, PERIOD),
        el!("mwstsatz", OPT, RATE),
        el!("minderungssatz", OPT, REDUCTION),
        el!("behandlungsart", OPT, TREATMENT),
        el!("vertragsart", ONE, D3),
        el!("beschreibung", OPT, T60),
        el!("aktenzeichen", OPT, T40),
        el!("diagnose", ANY, DIAGNOSIS),
        el!("positionen", ONE, POSITIONS),
        el!("summenblock", ONE, SUMS),
    ]),
};

const STATUTORY: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("behandelter", ONE, PATIENT),
        el!("versicherter", OPT, INSURED),
        el!("zeitraum", OPT, PERIOD),
        el!("behandlungsart", OPT, TREATMENT),
        el!("kvkartendaten", OPT, HEALTH_CARD),
        el!("diagnose", ANY, DIAGNOSIS),
        el!("positionen", ONE, POSITIONS),
        el!("summenblock", ONE, SUMS),
    ]),
};

const PRIVATE: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("behandelter", ONE, PATIENT),
        el!("versicherter", OPT, INSURED),
        el!("zeitraum", OPT, PERIOD),
        el!("minderungssatz", OPT, REDUCTION),
        el!("behandlungsart", OPT, TREATMENT),
        el!("diagnose", ANY, DIAGNOSIS),
        el!("positionen", ONE, POSITIONS),
        el!("summenblock", ONE, SUMS),
    ]),
};

const CASE: ElementRule = ElementRule {
    attrs: &[],
    content: Content::Sequence(&[Particle::Choice {
        occurs: ONE,
        options: &[
            ("bema", &STATUTORY),
            ("bmgnormprivat", &PRIVATE),
            ("bmgnormkfoprivat", &PRIVATE),
            ("eigenanteilsrechnung", &PRIVATE),
            ("humanmedizin", &HUMAN_MEDICINE),
        ],
    }]),
};

// ---------------------------------------------------------------------------
// rechnungen: positions
// ---------------------------------------------------------------------------

const FEE_LINE: ElementRule = ElementRule {
    attrs: &[
        opt!("positionsnr", Facet::Digits { max: 9 }),
        opt!("id", Facet::Text { min: 1, max: 40 }),
        opt!("idref", Facet::Text { min: 1, max: 40 }),
        opt!("berechnung", Facet::Enum(&["K", "H", "B"])),
        req!(
            "go",
            Facet::Enum(&["GOAE", "UVGOAE", "EBM", "GOZ", "BEMA", "GEBUEH", "BEL", "BEB"])
        ),
        opt!("goversion", Facet::Text { min: 1, max: 10 }),
        opt!("analog", Facet::Text { min: 1, max: 8 }),
        req!("ziffer", Facet::Text { min: 1, max: 8 }),
    ],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("datum", ONE, DATE),
        el!("uhrzeit", OPT, TIME),
        el!("anzahl", ONE, D4),
        el!("text", ONE, T4000),
        el!("zusatztext", OPT, T4000),
        el!("faktor", OPT, simple!(Facet::Decimal { total: 8, fraction: 6 })),
        el!("minderungssatz", OPT, REDUCTION),
        el!("punktwert", OPT, simple!(Facet::Decimal { total: 9, fraction: 7 })),
        el!("punktzahl", OPT, D5),
        el!("einzelbetrag", OPT, MONEY),
        el!("gesamtbetrag", ONE, MONEY),
        el!("mwstsatz", OPT, RATE),
        el!("begruendungstext", OPT, T4000),
    ]),
};

const EXPENSE_LINE: ElementRule = ElementRule {
    attrs: &[
        opt!("positionsnr", Facet::Digits { max: 9 }),
        opt!("id", Facet::Text { min: 1, max: 40 }),
        opt!("idref", Facet::Text { min: 1, max: 40 }),
        opt!("kennzeichen", Facet::Enum(&["M", "L", "P"])),
        opt!("berechnung", Facet::Enum(&["K"])),
    ],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("datum", ONE, DATE),
        el!("uhrzeit", OPT, TIME),
        el!("anzahl", ONE, D4),
        el!("text", ONE, T4000),
        el!("zusatztext", OPT, T4000),
        el!("mwstsatz", OPT, RATE),
        el!("einzelbetrag", ONE, MONEY),
        el!("gesamtbetrag", OPT, MONEY),
    ]),
};

const MILEAGE: ElementRule = ElementRule {
    attrs: &[opt!("tageszeit", Facet::Enum(&["T", "N"]))],
    content: Content::Sequence(&[el!(
        "radius",
        ONE,
        simple!(Facet::Enum(&["2", "5", "10", "25"]))
    )]),
};

const TRAVEL_COSTS: ElementRule = ElementRule {
    attrs: &[opt!("abwesenheit", Facet::Bool)],
    content: Content::Sequence(&[
        el!("wegstrecke", ONE, D4),
        el!("uebernachtungskosten", OPT, MONEY),
    ]),
};

const SHARE: ElementRule = ElementRule {
    attrs: &[req!("teiler", Facet::Digits { max: 2 })],
    content: Content::Empty,
};

const TRAVEL_LINE: ElementRule = ElementRule {
    attrs: &[
        opt!("positionsnr", Facet::Digits { max: 9 }),
        opt!("id", Facet::Text { min: 1, max: 40 }),
        opt!("idref", Facet::Text { min: 1, max: 40 }),
        opt!("go", Facet::Enum(&["GOAE", "GOZ"])),
    ],
    content: Content::Sequence(&[
        el!("leistungserbringerid", OPT, T40),
        el!("datum", ONE, DATE),
        el!("uhrzeit", OPT, TIME),
        el!("anzahl", ONE, D4),
        el!("text", ONE, T4000),
        el!("zusatztext", OPT, T4000),
        Particle::Choice {
            occurs: ONE,
            options: &[("wegegeld", &MILEAGE), ("reisekosten", &TRAVEL_COSTS)],
        },
        el!("anteil", OPT, SHARE),
        el!("einzelbetrag", OPT, MONEY),
        el!("gesamtbetrag", ONE, MONEY),
    ]),
};

const TEXT_LINE: ElementRule = ElementRule {
    attrs: &[
        opt!("positionsnr", Facet::Digits { max: 9 }),
        opt!("id", Facet::Text { min: 1, max: 40 }),
        opt!("idref", Facet::Text { min: 1, max: 40 }),
    ],
    content: Content::Sequence(&[el!("text", ONE, T4000)]),
};

const POSITIONS: ElementRule = ElementRule {
    attrs: &[req!("posanzahl", Facet::Digits { max: 4 })],
    content: Content::Sequence(&[Particle::Choice {
        occurs: Occurs { min: 0, max: 9999 },
        options: &[
            ("goziffer", &FEE_LINE),
            ("auslagen", &EXPENSE_LINE),
            ("entschaedigung", &TRAVEL_LINE),
            ("text", &TEXT_LINE),
        ],
    }]),
};

pub(crate) const RECHNUNGEN: ElementRule = ElementRule {
    attrs: &[req!("anzahl", Facet::Digits { max: 6 })],
    content: Content::Sequence(&[
        el!("hinweistext", OPT, T4000),
        el!("nachrichtentyp", ONE, simple!(Facet::Enum(&["ADL"]))),
        el!("rechnungsersteller", ONE, ISSUER),
        el!("leistungserbringer", SOME, PROVIDER),
        el!("rechnung", SOME, INVOICE),
    ]),
};
