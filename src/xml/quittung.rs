use crate::core::*;

use super::tree::Element;
use super::writer::{XmlWriter, format_datetime};
use super::{PAD_NAMESPACE, PadDocument, parse_datetime, parse_num};

impl PadDocument for Receipt {
    const ROOT: &'static str = "quittung";
    const KIND: DocumentKind = DocumentKind::Receipt;

    fn write_xml(&self, w: &mut XmlWriter) -> Result<(), PadnextError> {
        let transfer = self.transfer_number.to_string();
        let files = self.file_count.to_string();
        let invoices = self.invoice_count.to_string();
        w.start_element_with_attrs(
            "quittung",
            &[
                ("xmlns", PAD_NAMESPACE),
                ("datenlieferung", transfer.as_str()),
                ("dateianzahl", files.as_str()),
                ("rechnungsanzahl", invoices.as_str()),
            ],
        )?;

        w.text_element("nachrichtentyp", MessageKind::Receipt.code())?;
        w.text_element("eingangsdatum", &format_datetime(self.received_at))?;
        w.text_element("status", &self.status.code().to_string())?;
        for error in &self.errors {
            let code = error.code.to_string();
            let mut attrs = vec![("code", code.as_str()), ("text", error.text.as_str())];
            if let Some(hint) = &error.hint {
                attrs.push(("hinweis", hint.as_str()));
            }
            w.empty_element_with_attrs("fehler", &attrs)?;
        }

        w.end_element("quittung")?;
        Ok(())
    }

    fn from_element(root: &Element) -> Result<Self, PadnextError> {
        let message = root.req_text("nachrichtentyp")?;
        if MessageKind::from_code(message.trim()) != Some(MessageKind::Receipt) {
            return Err(PadnextError::Xml(format!(
                "receipt nachrichtentyp must be QADL, found '{message}'"
            )));
        }
        let status_code: u8 = parse_num(root.req_text("status")?, "status")?;
        let status = ReceiptStatus::from_code(status_code)
            .ok_or_else(|| PadnextError::Xml(format!("unknown receipt status {status_code}")))?;

        let errors = root
            .children_named("fehler")
            .map(|e| {
                Ok(ReceiptError {
                    code: parse_num(e.req_attr("code")?, "fehler/@code")?,
                    text: e.req_attr("text")?.to_string(),
                    hint: e.attr("hinweis").map(str::to_string),
                })
            })
            .collect::<Result<_, PadnextError>>()?;

        Ok(Receipt {
            received_at: parse_datetime(root.req_text("eingangsdatum")?, "eingangsdatum")?,
            status,
            errors,
            transfer_number: parse_num(root.req_attr("datenlieferung")?, "datenlieferung")?,
            file_count: parse_num(root.req_attr("dateianzahl")?, "dateianzahl")?,
            invoice_count: parse_num(root.req_attr("rechnungsanzahl")?, "rechnungsanzahl")?,
        })
    }
}
