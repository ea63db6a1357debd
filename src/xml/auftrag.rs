use crate::core::*;

use super::tree::Element;
use super::writer::{XmlWriter, format_bool, format_datetime};
use super::{PAD_NAMESPACE, PadDocument, opt, parse_bool, parse_datetime, parse_num};

impl PadDocument for OrderManifest {
    const ROOT: &'static str = "auftrag";
    const KIND: DocumentKind = DocumentKind::Manifest;

    fn write_xml(&self, w: &mut XmlWriter) -> Result<(), PadnextError> {
        let created = format_datetime(self.created_at);
        let transfer = self.transfer_number.to_string();
        let count = self.file_count.to_string();
        w.start_element_with_attrs(
            "auftrag",
            &[
                ("xmlns", PAD_NAMESPACE),
                ("erstellungsdatum", &created),
                ("transfernr", &transfer),
                ("echtdaten", format_bool(self.real_data)),
                ("dateianzahl", &count),
            ],
        )?;

        write_participant(w, "empfaenger", &self.receiver)?;
        write_participant(w, "absender", &self.sender)?;
        w.text_element_with_attrs(
            "nachrichtentyp",
            self.message_type.kind.code(),
            &[("version", &self.message_type.version)],
        )?;

        w.start_element("system")?;
        w.text_element("produkt", &self.system.product)?;
        w.text_element("version", &self.system.version)?;
        w.text_element("hersteller", &self.system.manufacturer)?;
        w.opt_text_element("zertifizierungsnr", self.system.certification_number.as_deref())?;
        w.end_element("system")?;

        w.empty_element_with_attrs(
            "verschluesselung",
            &[
                ("verfahren", self.encryption.procedure.code()),
                ("idcert", &self.encryption.certificate_id),
            ],
        )?;

        match &self.receipt.email {
            Some(email) => w.text_element_with_attrs(
                "empfangsquittung",
                format_bool(self.receipt.requested),
                &[("email", email)],
            )?,
            None => w.text_element("empfangsquittung", format_bool(self.receipt.requested))?,
        };

        for file in &self.files {
            write_file(w, file)?;
        }

        w.end_element("auftrag")?;
        Ok(())
    }

    fn from_element(root: &Element) -> Result<Self, PadnextError> {
        let message = root.req_child("nachrichtentyp")?;
        let kind = MessageKind::from_code(message.text.trim()).ok_or_else(|| {
            PadnextError::Xml(format!("unknown nachrichtentyp '{}'", message.text))
        })?;

        let system = root.req_child("system")?;
        let encryption = root.req_child("verschluesselung")?;
        let procedure_code = encryption.req_attr("verfahren")?.trim();
        let procedure = EncryptionProcedure::from_code(procedure_code)
            .ok_or_else(|| CryptoError::UnsupportedProcedure(procedure_code.to_string()))?;

        let receipt = root.req_child("empfangsquittung")?;

        let files = root
            .children_named("datei")
            .map(read_file)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderManifest {
            receiver: read_participant(root.req_child("empfaenger")?)?,
            sender: read_participant(root.req_child("absender")?)?,
            message_type: MessageType {
                kind,
                version: message.req_attr("version")?.to_string(),
            },
            system: SystemInfo {
                product: system.req_text("produkt")?.to_string(),
                version: system.req_text("version")?.to_string(),
                manufacturer: system.req_text("hersteller")?.to_string(),
                certification_number: system.child_text("zertifizierungsnr").map(str::to_string),
            },
            encryption: EncryptionDescriptor {
                procedure,
                certificate_id: encryption.req_attr("idcert")?.to_string(),
            },
            receipt: ReceiptRequest {
                requested: parse_bool(&receipt.text, "empfangsquittung")?,
                email: receipt.attr("email").map(str::to_string),
            },
            files,
            created_at: parse_datetime(root.req_attr("erstellungsdatum")?, "erstellungsdatum")?,
            transfer_number: parse_num(root.req_attr("transfernr")?, "transfernr")?,
            real_data: parse_bool(root.req_attr("echtdaten")?, "echtdaten")?,
            file_count: parse_num(root.req_attr("dateianzahl")?, "dateianzahl")?,
        })
    }
}

fn write_participant(w: &mut XmlWriter, name: &str, p: &Participant) -> Result<(), PadnextError> {
    w.start_element(name)?;
    write_participant_id(w, "logisch", &p.logical)?;
    write_participant_id(w, "physikalisch", &p.physical)?;
    w.end_element(name)?;
    Ok(())
}

fn write_participant_id(
    w: &mut XmlWriter,
    name: &str,
    id: &ParticipantId,
) -> Result<(), PadnextError> {
    let mut attrs: Vec<(&str, String)> = Vec::new();
    if let Some(n) = id.customer_number {
        attrs.push(("kundennr", n.to_string()));
    }
    if let Some(n) = id.rz_id {
        attrs.push(("rzid", n.to_string()));
    }
    if let Some(n) = id.ik_number {
        attrs.push(("iknr", n.to_string()));
    }
    let attrs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
    w.text_element_with_attrs(name, &id.name, &attrs)?;
    Ok(())
}

fn read_participant(elem: &Element) -> Result<Participant, PadnextError> {
    Ok(Participant {
        logical: read_participant_id(elem.req_child("logisch")?)?,
        physical: read_participant_id(elem.req_child("physikalisch")?)?,
    })
}

fn read_participant_id(elem: &Element) -> Result<ParticipantId, PadnextError> {
    Ok(ParticipantId {
        name: elem.text.clone(),
        customer_number: opt(elem.attr("kundennr"), |v| parse_num(v, "kundennr"))?,
        rz_id: opt(elem.attr("rzid"), |v| parse_num(v, "rzid"))?,
        ik_number: opt(elem.attr("iknr"), |v| parse_num(v, "iknr"))?,
    })
}

fn write_file(w: &mut XmlWriter, file: &FileEntry) -> Result<(), PadnextError> {
    let created = file.created_at.map(format_datetime);
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if let Some(id) = &file.id {
        attrs.push(("id", id.as_str()));
    }
    if let Some(created) = &created {
        attrs.push(("erstellungsdatum", created.as_str()));
    }
    w.start_element_with_attrs("datei", &attrs)?;

    match file.format {
        Some(format) => w.text_element_with_attrs(
            "dokumententyp",
            file.document_type.code(),
            &[("format", format.code())],
        )?,
        None => w.text_element("dokumententyp", file.document_type.code())?,
    };
    w.text_element("name", &file.name)?;
    w.opt_text_element("beschreibung", file.description.as_deref())?;
    let length = file.length.to_string();
    w.empty_element_with_attrs(
        "dateilaenge",
        &[("laenge", &length), ("pruefsumme", &file.checksum)],
    )?;

    w.end_element("datei")?;
    Ok(())
}

fn read_file(elem: &Element) -> Result<FileEntry, PadnextError> {
    let doc_type = elem.req_child("dokumententyp")?;
    let document_type = DocumentType::from_code(doc_type.text.trim()).ok_or_else(|| {
        PadnextError::Xml(format!("unknown dokumententyp '{}'", doc_type.text))
    })?;
    let format = opt(doc_type.attr("format"), |v| {
        AttachmentFormat::from_code(v.trim())
            .ok_or_else(|| PadnextError::Xml(format!("unknown attachment format '{v}'")))
    })?;
    let length = elem.req_child("dateilaenge")?;

    Ok(FileEntry {
        document_type,
        format,
        name: elem.req_text("name")?.to_string(),
        description: elem.child_text("beschreibung").map(str::to_string),
        length: parse_num(length.req_attr("laenge")?, "laenge")?,
        checksum: length.req_attr("pruefsumme")?.to_string(),
        id: elem.attr("id").map(str::to_string),
        created_at: opt(elem.attr("erstellungsdatum"), |v| {
            parse_datetime(v, "datei/@erstellungsdatum")
        })?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::{deserialize, serialize};
    use super::*;
    use chrono::NaiveDate;

    fn manifest() -> OrderManifest {
        let created = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let sender = ParticipantId::new("Praxis Dr. Müller").customer_number(12345678);
        let receiver = ParticipantId::new("Abrechnungszentrum").rz_id(42).ik_number(123456789);
        OrderManifestBuilder::new(Participant::same(sender), Participant::same(receiver), created)
            .encryption(EncryptionDescriptor::pkcs7("cert-01"))
            .receipt(true, Some("eingang@example.org"))
            .add_file(FileEntry {
                document_type: DocumentType::PadNext,
                format: None,
                name: "12345678_20260302_ADL_000007_padx.xml".into(),
                description: Some("Rechnungsdaten".into()),
                length: 4096,
                checksum: "da39a3ee5e6b4b0d3255bfef95601890afd80709".into(),
                id: Some("1".into()),
                created_at: Some(created),
            })
            .transfer_number(7)
            .build()
            .unwrap()
    }

    #[test]
    fn manifest_roundtrip() {
        let original = manifest();
        let bytes = serialize(&original).unwrap();
        let back: OrderManifest = deserialize(&bytes).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn manifest_layout() {
        let bytes = serialize(&manifest()).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(r#"<auftrag xmlns="http://padinfo.de/ns/pad""#));
        assert!(text.contains(r#"transfernr="7""#));
        assert!(text.contains(r#"<verschluesselung verfahren="1" idcert="cert-01"/>"#));
        assert!(text.contains(r#"<logisch kundennr="12345678">"#));
    }

    #[test]
    fn unknown_procedure_is_a_crypto_error() {
        let bytes = serialize(&manifest()).unwrap();
        let text = String::from_utf8_lossy(&bytes).replace(r#"verfahren="1""#, r#"verfahren="7""#);
        let err = deserialize::<OrderManifest>(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PadnextError::Crypto(CryptoError::UnsupportedProcedure(ref code)) if code == "7"
        ));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = deserialize::<OrderManifest>(b"<quittung/>").unwrap_err();
        assert!(matches!(err, PadnextError::Xml(_)));
    }
}
